//! Resolved data-model IR for remodel.
//!
//! External schema loaders hand the derivation engine a fully resolved
//! [`Registry`]: models with ordered fields, embedded types, enums, default
//! value descriptors and documentation text. Everything here is plain data;
//! no grammar resolution happens in this crate.
//!
//! Documentation text may carry `@tag` / `@tag(arg)` markers that control how
//! a field appears in each derived representation. They are parsed once per
//! field into a typed [`AnnotationSet`]; downstream classification never
//! re-scans raw text.
//!
//! The whole IR is serde-serializable so registries can be handed over (and
//! test fixtures stored) as JSON.

pub mod annotations;
pub mod model;

pub use annotations::{Annotation, AnnotationSet, Tag};
pub use model::{
    DefaultValue, EnumDef, Field, FieldKind, Model, ModelKind, OutputPaths, Registry,
};
