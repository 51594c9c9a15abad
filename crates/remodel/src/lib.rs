//! Representation derivation engine for data-model registries.
//!
//! `remodel` takes a resolved registry of models, embedded types and enums
//! (see [`remodel_schema`]) and derives, per model, the structural
//! representations a typed API surface needs, plus, optionally, parallel
//! runtime-validation schema expressions for each.
//!
//! # Architecture
//!
//! ```text
//! Registry            Derivation                 Output bundles
//! ────────────     ─────────────────────     ──────────────────────
//! models  ──┐      classify ─> materialize   plain / create / update
//! types   ──┼────> per-representation  ────> connect / entity fields,
//! enums   ──┘      policy + references       imports, lazy relations,
//!                                            validator expressions
//! ```
//!
//! The engine is a pure, single-pass, synchronous function of
//! (registry, configuration): no shared mutable state, no filesystem, no
//! text templating. Rendering the bundles into source files is the
//! responsibility of a downstream collaborator.
//!
//! # Example
//!
//! ```
//! use remodel::{GeneratorConfig, generate};
//! use remodel_schema::{Field, Model, Registry};
//!
//! let registry = Registry::new(
//!     vec![Model::new(
//!         "User",
//!         vec![
//!             Field::scalar("id", "Int").id(),
//!             Field::scalar("email", "String").unique(),
//!         ],
//!     )],
//!     vec![],
//! );
//!
//! let outputs = generate(&registry, &GeneratorConfig::default()).unwrap();
//! assert_eq!(outputs.len(), 5); // plain, create, update, connect, entity
//! ```

pub mod check;
pub mod classify;
pub mod config;
pub mod derive;
pub mod generate;
pub mod imports;
pub mod parsed;
pub mod validator;

pub use check::{Finding, check_references};
pub use config::{CaseStyle, ConfigError, GeneratorConfig, OutputMode, ReprAffix};
pub use derive::{DerivedModel, Representation, derive_model, relation_scalar_map};
pub use generate::{
    EnumOutput, GenerateError, ModelOutput, Output, SchemaField, ValidatorSchema, generate,
};
pub use imports::{ImportRequirement, merge_imports};
pub use parsed::{FieldOverrides, ParsedField};
pub use validator::{CompileOptions, compile};
