//! Validator expression compiler.
//!
//! Maps a [`ParsedField`] to a Zod-flavored runtime-validation expression
//! string. The engine only builds expressions; the rendering collaborator
//! decides where they land in a file.
//!
//! Resolution order (first match wins): custom-type tag, deferred reference,
//! enum, uuid id, datetime-with-generator, scalar table. Unrecognized scalar
//! types fall back to the unconstrained validator; schema evolution must
//! never break generation.

use std::collections::HashMap;
use std::sync::LazyLock;

use tracing::warn;

use remodel_schema::FieldKind;

use crate::parsed::ParsedField;

/// Scalar-type tag → validator expression. Immutable, built once.
static SCALAR_VALIDATORS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("String", "z.string()"),
        ("Boolean", "z.boolean()"),
        ("Int", "z.number().int()"),
        ("BigInt", "z.bigint()"),
        // Float and Decimal both collapse to the general numeric validator;
        // the precision distinction is not representable downstream.
        ("Float", "z.number()"),
        ("Decimal", "z.number()"),
        ("DateTime", "z.date()"),
        ("Json", "z.record(z.unknown())"),
        ("Bytes", "z.instanceof(Buffer)"),
    ])
});

/// The unconstrained validator used for custom-typed fields and any scalar
/// tag absent from the table.
const OPAQUE: &str = "z.unknown()";

/// Compilation context for one representation.
pub struct CompileOptions<'a> {
    /// Update representations are blanket-optional: every non-id field that
    /// was not forced required carries the combined modifier.
    pub update_representation: bool,
    /// Resolves a referenced model/type name to the schema const the deferred
    /// reference should point at.
    pub target_schema_namer: &'a dyn Fn(&str) -> String,
}

/// Compile one field into a validator expression.
pub fn compile(field: &ParsedField, options: &CompileOptions) -> String {
    let mut expr = base_expression(field, options);

    if field.is_list {
        expr.push_str(".array()");
    }

    // Optionality composition. There is no "optional but never null" modifier
    // distinct from the combined one: any not-required field tolerates null,
    // even when its nullable flag is off. Deliberate, load-bearing collapse.
    if options.update_representation && !field.is_id {
        if !field.is_required {
            expr.push_str(".nullish()");
        }
    } else if field.is_nullable && field.is_required {
        expr.push_str(".nullable()");
    } else if !field.is_required {
        expr.push_str(".nullish()");
    }

    expr
}

fn base_expression(field: &ParsedField, options: &CompileOptions) -> String {
    if field.custom_type().is_some() {
        return OPAQUE.to_string();
    }

    match field.kind {
        FieldKind::Object => {
            // Deferred so self/mutual/forward references resolve at use time.
            let target = (options.target_schema_namer)(&field.type_name);
            format!("z.lazy(() => {target})")
        }
        FieldKind::Enum => format!("z.nativeEnum({})", field.type_name),
        FieldKind::Scalar => {
            if field.is_id
                && field.type_name == "String"
                && field.default.as_ref().is_some_and(|d| d.is_generator("uuid"))
            {
                return "z.string().uuid()".to_string();
            }
            if field.type_name == "DateTime"
                && (field.is_updated_at
                    || field.default.as_ref().is_some_and(|d| d.is_generator("now")))
            {
                return "z.string().datetime().transform((v) => new Date(v))".to_string();
            }
            match SCALAR_VALIDATORS.get(field.type_name.as_str()) {
                Some(expr) => (*expr).to_string(),
                None => {
                    warn!(
                        field = %field.name,
                        type_name = %field.type_name,
                        "scalar type not in validator table; using the unconstrained validator"
                    );
                    OPAQUE.to_string()
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsed::FieldOverrides;
    use remodel_schema::{DefaultValue, Field};

    fn namer(name: &str) -> String {
        format!("{name}EntitySchema")
    }

    fn options() -> CompileOptions<'static> {
        CompileOptions {
            update_representation: false,
            target_schema_namer: &namer,
        }
    }

    fn parse(field: Field) -> ParsedField {
        ParsedField::materialize(&field, FieldOverrides::default(), "Post")
    }

    fn parse_with(field: Field, overrides: FieldOverrides) -> ParsedField {
        ParsedField::materialize(&field, overrides, "Post")
    }

    #[test]
    fn scalar_table_lookups() {
        insta::assert_snapshot!(
            compile(&parse(Field::scalar("title", "String")), &options()),
            @"z.string()"
        );
        insta::assert_snapshot!(
            compile(&parse(Field::scalar("views", "Int")), &options()),
            @"z.number().int()"
        );
        insta::assert_snapshot!(
            compile(&parse(Field::scalar("meta", "Json")), &options()),
            @"z.record(z.unknown())"
        );
        insta::assert_snapshot!(
            compile(&parse(Field::scalar("blob", "Bytes")), &options()),
            @"z.instanceof(Buffer)"
        );
    }

    #[test]
    fn float_and_decimal_collapse() {
        let float = compile(&parse(Field::scalar("a", "Float")), &options());
        let decimal = compile(&parse(Field::scalar("b", "Decimal")), &options());
        assert_eq!(float, "z.number()");
        assert_eq!(decimal, float);
    }

    #[test]
    fn unknown_scalar_falls_back_to_opaque() {
        insta::assert_snapshot!(
            compile(&parse(Field::scalar("geo", "GeoPoint")), &options()),
            @"z.unknown()"
        );
    }

    #[test]
    fn uuid_id_gets_uuid_validator() {
        let field = Field::scalar("id", "String")
            .id()
            .with_default(DefaultValue::generator("uuid"));
        insta::assert_snapshot!(compile(&parse(field), &options()), @"z.string().uuid()");
    }

    #[test]
    fn plain_string_id_is_just_a_string() {
        let field = Field::scalar("id", "String").id();
        assert_eq!(compile(&parse(field), &options()), "z.string()");
    }

    #[test]
    fn datetime_with_now_default_parses_to_native_date() {
        let field = Field::scalar("createdAt", "DateTime")
            .with_default(DefaultValue::generator("now"));
        insta::assert_snapshot!(
            compile(&parse(field), &options()),
            @"z.string().datetime().transform((v) => new Date(v))"
        );
    }

    #[test]
    fn updated_at_gets_the_same_transform() {
        let field = Field::scalar("updatedAt", "DateTime").updated_at();
        assert_eq!(
            compile(&parse(field), &options()),
            "z.string().datetime().transform((v) => new Date(v))"
        );
    }

    #[test]
    fn bare_datetime_is_a_date() {
        let field = Field::scalar("publishedAt", "DateTime");
        assert_eq!(compile(&parse(field), &options()), "z.date()");
    }

    #[test]
    fn relations_defer_through_the_namer() {
        let field = Field::object("author", "User");
        insta::assert_snapshot!(
            compile(&parse(field), &options()),
            @"z.lazy(() => UserEntitySchema)"
        );
    }

    #[test]
    fn enums_use_native_enum() {
        let field = Field::enumeration("role", "Role");
        assert_eq!(compile(&parse(field), &options()), "z.nativeEnum(Role)");
    }

    #[test]
    fn custom_type_is_opaque_even_for_relations() {
        let field = Field::object("author", "User").with_docs("@typeCast(AuthorRef)");
        assert_eq!(compile(&parse(field), &options()), "z.unknown()");
    }

    #[test]
    fn lists_wrap_before_optionality() {
        let field = Field::object("posts", "Post").list();
        let parsed = parse_with(field, FieldOverrides::new(false, false));
        insta::assert_snapshot!(
            compile(&parsed, &options()),
            @"z.lazy(() => PostEntitySchema).array().nullish()"
        );
    }

    #[test]
    fn nullable_required_field_gets_nullable_only() {
        let field = Field::scalar("bio", "String");
        let parsed = parse_with(field, FieldOverrides::new(true, true));
        assert_eq!(compile(&parsed, &options()), "z.string().nullable()");
    }

    #[test]
    fn optional_collapses_to_nullish_even_when_non_nullable() {
        let field = Field::scalar("bio", "String");
        let parsed = parse_with(field, FieldOverrides::new(false, false));
        assert_eq!(compile(&parsed, &options()), "z.string().nullish()");
    }

    #[test]
    fn update_representation_is_blanket_nullish() {
        let update = CompileOptions {
            update_representation: true,
            target_schema_namer: &namer,
        };
        let parsed = parse_with(Field::scalar("title", "String"), FieldOverrides::required(false));
        assert_eq!(compile(&parsed, &update), "z.string().nullish()");
    }

    #[test]
    fn update_required_field_carries_no_modifiers() {
        let update = CompileOptions {
            update_representation: true,
            target_schema_namer: &namer,
        };
        let parsed = parse_with(Field::scalar("title", "String"), FieldOverrides::required(true));
        assert_eq!(compile(&parsed, &update), "z.string()");
    }
}
