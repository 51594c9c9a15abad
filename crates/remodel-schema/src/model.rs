//! Data-model types: registry, models, fields, enums, default values.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::annotations::AnnotationSet;

/// Default-value generator names the engine understands.
///
/// Anything else is carried through but classified as "no default"
/// (schema sources evolve independently of this generator).
pub const RECOGNIZED_GENERATORS: &[&str] = &["autoincrement", "sequence", "uuid", "cuid", "now"];

// ============================================================================
// Registry
// ============================================================================

/// A resolved set of models, embedded types and enums.
///
/// Model names are unique within a registry. Relations and embedded-type
/// fields resolve against it by name. The registry is read-only for the
/// duration of a generation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Registry {
    #[serde(default)]
    pub models: Vec<Model>,
    #[serde(default)]
    pub enums: Vec<EnumDef>,
}

impl Registry {
    pub fn new(models: Vec<Model>, enums: Vec<EnumDef>) -> Self {
        Self { models, enums }
    }

    /// Look up a model or embedded type by name.
    pub fn model(&self, name: &str) -> Option<&Model> {
        self.models.iter().find(|m| m.name == name)
    }

    /// Look up an enum by name.
    pub fn enum_def(&self, name: &str) -> Option<&EnumDef> {
        self.enums.iter().find(|e| e.name == name)
    }

    /// Proper models, in declaration order.
    pub fn struct_models(&self) -> impl Iterator<Item = &Model> {
        self.models.iter().filter(|m| m.kind == ModelKind::Model)
    }

    /// Embedded types, in declaration order.
    pub fn embedded_types(&self) -> impl Iterator<Item = &Model> {
        self.models.iter().filter(|m| m.kind == ModelKind::Type)
    }

    pub fn has_embedded_types(&self) -> bool {
        self.embedded_types().next().is_some()
    }
}

// ============================================================================
// Model
// ============================================================================

/// Whether a registry entry is a proper model or an embedded type.
///
/// Embedded types have no independent identity: they are composed into model
/// fields and therefore have no connect or entity representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Model,
    Type,
}

/// Output-location descriptor: one directory slot for input/DTO-style
/// representations and one for entity-style representations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputPaths {
    pub dto: String,
    pub entity: String,
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self {
            dto: "dto".to_string(),
            entity: "entities".to_string(),
        }
    }
}

/// A named structural type with an ordered sequence of fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Model {
    pub name: String,
    #[serde(default = "ModelKind::model")]
    pub kind: ModelKind,
    pub fields: Vec<Field>,
    #[serde(default)]
    pub output: OutputPaths,
    #[serde(default)]
    pub documentation: Option<String>,
    #[serde(skip)]
    annotations: OnceLock<AnnotationSet>,
}

impl ModelKind {
    fn model() -> Self {
        ModelKind::Model
    }
}

impl Model {
    pub fn new(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            kind: ModelKind::Model,
            fields,
            output: OutputPaths::default(),
            documentation: None,
            annotations: OnceLock::new(),
        }
    }

    /// An embedded type (no independent identity).
    pub fn embedded(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            kind: ModelKind::Type,
            ..Self::new(name, fields)
        }
    }

    pub fn with_output(mut self, dto: impl Into<String>, entity: impl Into<String>) -> Self {
        self.output = OutputPaths {
            dto: dto.into(),
            entity: entity.into(),
        };
        self
    }

    pub fn with_docs(mut self, docs: impl Into<String>) -> Self {
        self.documentation = Some(docs.into());
        self
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Annotations from the model's documentation, parsed on first access.
    pub fn annotations(&self) -> &AnnotationSet {
        self.annotations
            .get_or_init(|| AnnotationSet::parse(self.documentation.as_deref()))
    }
}

// ============================================================================
// Field
// ============================================================================

/// The structural kind of a field's type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// A scalar-type tag (e.g. `String`, `Int`, `DateTime`).
    Scalar,
    /// Another registry entry (a model or embedded type).
    Object,
    /// An enum name.
    Enum,
}

/// A field of a [`Model`].
///
/// `is_required` here is schema-level non-null truth. The per-representation
/// required/nullable flags live on the engine's parsed-field record, never
/// here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub kind: FieldKind,
    /// Scalar-type tag, enum name, or another registry entry's name,
    /// depending on `kind`.
    pub type_name: String,
    #[serde(default)]
    pub is_list: bool,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub is_id: bool,
    #[serde(default)]
    pub is_unique: bool,
    #[serde(default)]
    pub is_read_only: bool,
    #[serde(default)]
    pub is_updated_at: bool,
    #[serde(default)]
    pub default: Option<DefaultValue>,
    /// For object-kind fields: names of the foreign-key scalar fields on the
    /// owning model that back this relation.
    #[serde(default)]
    pub relation_from_fields: Vec<String>,
    #[serde(default)]
    pub documentation: Option<String>,
    #[serde(skip)]
    annotations: OnceLock<AnnotationSet>,
}

impl Field {
    fn base(name: impl Into<String>, kind: FieldKind, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            type_name: type_name.into(),
            is_list: false,
            is_required: true,
            is_id: false,
            is_unique: false,
            is_read_only: false,
            is_updated_at: false,
            default: None,
            relation_from_fields: Vec::new(),
            documentation: None,
            annotations: OnceLock::new(),
        }
    }

    /// A required scalar field.
    pub fn scalar(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::base(name, FieldKind::Scalar, type_name)
    }

    /// A required relation or embedded-type field.
    pub fn object(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::base(name, FieldKind::Object, target)
    }

    /// A required enum-typed field.
    pub fn enumeration(name: impl Into<String>, enum_name: impl Into<String>) -> Self {
        Self::base(name, FieldKind::Enum, enum_name)
    }

    pub fn optional(mut self) -> Self {
        self.is_required = false;
        self
    }

    pub fn list(mut self) -> Self {
        self.is_list = true;
        self
    }

    pub fn id(mut self) -> Self {
        self.is_id = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.is_unique = true;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.is_read_only = true;
        self
    }

    pub fn updated_at(mut self) -> Self {
        self.is_updated_at = true;
        self
    }

    pub fn with_default(mut self, default: DefaultValue) -> Self {
        self.default = Some(default);
        self
    }

    pub fn from_fields<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.relation_from_fields = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_docs(mut self, docs: impl Into<String>) -> Self {
        self.documentation = Some(docs.into());
        self
    }

    /// Annotations from the field's documentation, parsed on first access.
    pub fn annotations(&self) -> &AnnotationSet {
        self.annotations
            .get_or_init(|| AnnotationSet::parse(self.documentation.as_deref()))
    }
}

// ============================================================================
// Default values
// ============================================================================

/// A field's default: either a literal value or a named generator
/// (`autoincrement`, `uuid`, `now`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultValue {
    Literal(serde_json::Value),
    Generator(String),
}

impl DefaultValue {
    pub fn literal(value: impl Into<serde_json::Value>) -> Self {
        DefaultValue::Literal(value.into())
    }

    pub fn generator(name: impl Into<String>) -> Self {
        DefaultValue::Generator(name.into())
    }

    /// Whether the engine treats this descriptor as a real default.
    ///
    /// Unknown generator names degrade to "no default" rather than failing.
    pub fn is_recognized(&self) -> bool {
        match self {
            DefaultValue::Literal(_) => true,
            DefaultValue::Generator(name) => RECOGNIZED_GENERATORS.contains(&name.as_str()),
        }
    }

    /// True iff this is the named generator.
    pub fn is_generator(&self, name: &str) -> bool {
        matches!(self, DefaultValue::Generator(n) if n == name)
    }
}

// ============================================================================
// Enums
// ============================================================================

/// An enum: a name plus an ordered list of member names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumDef {
    pub name: String,
    pub values: Vec<String>,
    #[serde(default)]
    pub documentation: Option<String>,
}

impl EnumDef {
    pub fn new<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
            documentation: None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn blog_registry() -> Registry {
        Registry::new(
            vec![
                Model::new(
                    "User",
                    vec![
                        Field::scalar("id", "Int")
                            .id()
                            .with_default(DefaultValue::generator("autoincrement")),
                        Field::scalar("email", "String").unique(),
                        Field::object("posts", "Post").list(),
                    ],
                ),
                Model::new(
                    "Post",
                    vec![
                        Field::scalar("id", "Int")
                            .id()
                            .with_default(DefaultValue::generator("autoincrement")),
                        Field::scalar("authorId", "Int").read_only(),
                        Field::object("author", "User").from_fields(["authorId"]),
                    ],
                ),
            ],
            vec![EnumDef::new("Role", ["USER", "ADMIN"])],
        )
    }

    #[test]
    fn registry_lookup_by_name() {
        let registry = blog_registry();
        assert!(registry.model("User").is_some());
        assert!(registry.model("Missing").is_none());
        assert!(registry.enum_def("Role").is_some());
    }

    #[test]
    fn split_models_and_types() {
        let mut registry = blog_registry();
        registry
            .models
            .push(Model::embedded("Address", vec![Field::scalar("city", "String")]));

        assert_eq!(registry.struct_models().count(), 2);
        assert_eq!(registry.embedded_types().count(), 1);
        assert!(registry.has_embedded_types());
    }

    #[test]
    fn builders_set_flags() {
        let field = Field::scalar("updatedAt", "DateTime")
            .updated_at()
            .with_default(DefaultValue::generator("now"));
        assert!(field.is_updated_at);
        assert!(field.is_required);
        assert!(field.default.as_ref().unwrap().is_generator("now"));
    }

    #[test]
    fn unknown_generator_is_not_a_default() {
        assert!(DefaultValue::generator("uuid").is_recognized());
        assert!(DefaultValue::literal(0).is_recognized());
        assert!(!DefaultValue::generator("dbgenerated").is_recognized());
    }

    #[test]
    fn registry_round_trips_json() {
        let registry = blog_registry();
        let json = serde_json::to_string(&registry).unwrap();
        let back: Registry = serde_json::from_str(&json).unwrap();
        assert_eq!(back.models.len(), registry.models.len());
        assert_eq!(back.model("Post").unwrap().fields.len(), 3);
        assert_eq!(
            back.model("Post").unwrap().field("author").unwrap().relation_from_fields,
            vec!["authorId"]
        );
    }

    #[test]
    fn field_annotations_parse_from_docs() {
        let field = Field::scalar("secret", "String").with_docs("internal\n@createHidden");
        assert!(field.annotations().has(crate::Tag::CreateHidden));
    }

    #[test]
    fn model_annotations_parse_from_docs() {
        let model = Model::new("AuditLog", vec![]).with_docs("Append-only. @immutable");
        assert!(!model.annotations().is_empty());

        let plain = Model::new("User", vec![]);
        assert!(plain.annotations().is_empty());
    }
}
