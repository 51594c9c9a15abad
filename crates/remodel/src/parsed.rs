//! Field materialization.
//!
//! A [`ParsedField`] is a schema field frozen for one target representation:
//! the representation-local required/nullable flags are resolved here and must
//! never be confused with the schema-level `is_required` on the source field.

use serde::{Deserialize, Serialize};

use remodel_schema::{AnnotationSet, DefaultValue, Field, FieldKind};

/// Representation-local flag overrides.
///
/// Anything left `None` falls back to the source field: `is_required` to the
/// schema-level flag, `is_nullable` to its inverse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldOverrides {
    pub is_required: Option<bool>,
    pub is_nullable: Option<bool>,
}

impl FieldOverrides {
    pub fn required(value: bool) -> Self {
        Self {
            is_required: Some(value),
            is_nullable: Some(!value),
        }
    }

    pub fn new(is_required: bool, is_nullable: bool) -> Self {
        Self {
            is_required: Some(is_required),
            is_nullable: Some(is_nullable),
        }
    }
}

/// A field normalized for one output representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedField {
    pub name: String,
    pub kind: FieldKind,
    pub type_name: String,
    pub is_list: bool,
    /// Required *in this representation*, not schema truth.
    pub is_required: bool,
    /// Nullable *in this representation*, not schema truth.
    pub is_nullable: bool,
    pub is_id: bool,
    pub is_unique: bool,
    pub is_read_only: bool,
    pub is_updated_at: bool,
    pub default: Option<DefaultValue>,
    pub documentation: Option<String>,
    /// Owning model's name; needed to detect self-references.
    pub model_name: String,
    annotations: AnnotationSet,
}

impl ParsedField {
    /// Freeze `field` for one representation.
    ///
    /// Overrides take precedence over the schema-level flags; every other
    /// attribute is copied unchanged. No validation happens here: an
    /// impossible combination (required and nullable at once) is
    /// representable, and resolving it is the deriver's job.
    pub fn materialize(field: &Field, overrides: FieldOverrides, model_name: &str) -> Self {
        Self {
            name: field.name.clone(),
            kind: field.kind,
            type_name: field.type_name.clone(),
            is_list: field.is_list,
            is_required: overrides.is_required.unwrap_or(field.is_required),
            is_nullable: overrides.is_nullable.unwrap_or(!field.is_required),
            is_id: field.is_id,
            is_unique: field.is_unique,
            is_read_only: field.is_read_only,
            is_updated_at: field.is_updated_at,
            default: field.default.clone(),
            documentation: field.documentation.clone(),
            model_name: model_name.to_string(),
            annotations: field.annotations().clone(),
        }
    }

    pub fn annotations(&self) -> &AnnotationSet {
        &self.annotations
    }

    /// Literal replacement type from a type-override or type-cast tag.
    pub fn custom_type(&self) -> Option<&str> {
        self.annotations.custom_type()
    }

    /// Whether this field references its own model.
    pub fn is_self_reference(&self) -> bool {
        self.kind == FieldKind::Object && self.type_name == self.model_name
    }

    /// Drop the read-only marker; used when a tagged foreign-key scalar is
    /// forced into a writable representation.
    pub fn writable(mut self) -> Self {
        self.is_read_only = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_mirror_schema_flags() {
        let field = Field::scalar("title", "String");
        let parsed = ParsedField::materialize(&field, FieldOverrides::default(), "Post");
        assert!(parsed.is_required);
        assert!(!parsed.is_nullable);

        let optional = Field::scalar("subtitle", "String").optional();
        let parsed = ParsedField::materialize(&optional, FieldOverrides::default(), "Post");
        assert!(!parsed.is_required);
        assert!(parsed.is_nullable);
    }

    #[test]
    fn overrides_take_precedence() {
        let field = Field::scalar("title", "String");
        let parsed = ParsedField::materialize(&field, FieldOverrides::required(false), "Post");
        assert!(!parsed.is_required);
        assert!(parsed.is_nullable);
    }

    #[test]
    fn invalid_combinations_are_representable() {
        let field = Field::scalar("title", "String");
        let parsed = ParsedField::materialize(&field, FieldOverrides::new(true, true), "Post");
        assert!(parsed.is_required);
        assert!(parsed.is_nullable);
    }

    #[test]
    fn self_reference_detection() {
        let field = Field::object("parent", "Category");
        let parsed = ParsedField::materialize(&field, FieldOverrides::default(), "Category");
        assert!(parsed.is_self_reference());

        let other = ParsedField::materialize(&field, FieldOverrides::default(), "Post");
        assert!(!other.is_self_reference());
    }

    #[test]
    fn writable_clears_read_only() {
        let field = Field::scalar("authorId", "Int").read_only();
        let parsed =
            ParsedField::materialize(&field, FieldOverrides::default(), "Post").writable();
        assert!(!parsed.is_read_only);
    }
}
