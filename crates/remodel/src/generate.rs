//! Orchestration: registry + configuration → output bundles.
//!
//! Single synchronous pass. Enums come first, then embedded types, then
//! models (fields may reference types, never the other way around). Every
//! bundle is plain data for the rendering collaborator; the engine emits no
//! text and touches no filesystem.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use remodel_schema::{EnumDef, Model, ModelKind, Registry};

use crate::check::check_references;
use crate::config::{GeneratorConfig, OutputMode};
use crate::derive::{DerivedModel, Representation, derive_with_map, relation_scalar_map};
use crate::imports::ImportRequirement;
use crate::parsed::ParsedField;
use crate::validator::{CompileOptions, compile};

// ============================================================================
// Output bundles
// ============================================================================

/// One emitted file specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Output {
    Model(ModelOutput),
    Enum(EnumOutput),
}

/// One representation of one model/type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelOutput {
    pub file_path: String,
    pub representation: Representation,
    pub model_name: String,
    pub class_name: String,
    pub fields: Vec<ParsedField>,
    pub imports: Vec<ImportRequirement>,
    pub lazy_relations: Vec<String>,
    /// Present when validation schemas are enabled.
    pub schema: Option<ValidatorSchema>,
}

/// Validator-schema params for one representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatorSchema {
    pub name: String,
    pub fields: Vec<SchemaField>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaField {
    pub name: String,
    pub expression: String,
}

/// One enum declaration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumOutput {
    pub file_path: String,
    pub name: String,
    pub values: Vec<String>,
}

// ============================================================================
// Errors
// ============================================================================

/// Structural configuration errors. Fatal: the run aborts before producing
/// any output, because downstream representations would be inconsistent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
    #[error(
        "entity-only output cannot represent embedded types (found: {})",
        .type_names.join(", ")
    )]
    EntityModeWithTypes { type_names: Vec<String> },
}

// ============================================================================
// Generation
// ============================================================================

/// Run the full derivation over a registry.
pub fn generate(
    registry: &Registry,
    config: &GeneratorConfig,
) -> Result<Vec<Output>, GenerateError> {
    let embedded: Vec<&Model> = registry.embedded_types().collect();
    if config.mode == OutputMode::Entity && !embedded.is_empty() {
        return Err(GenerateError::EntityModeWithTypes {
            type_names: embedded.iter().map(|m| m.name.clone()).collect(),
        });
    }

    for finding in check_references(registry, config.exhaustive_relation_checks) {
        warn!(%finding, "registry reference check");
    }

    let mut outputs = Vec::new();

    for enum_def in &registry.enums {
        outputs.push(Output::Enum(enum_output(enum_def, config)));
    }
    for model in embedded {
        derive_outputs(model, registry, config, &mut outputs);
    }
    for model in registry.struct_models() {
        derive_outputs(model, registry, config, &mut outputs);
    }

    Ok(outputs)
}

fn enum_output(enum_def: &EnumDef, config: &GeneratorConfig) -> EnumOutput {
    EnumOutput {
        file_path: format!(
            "enums/{}.{}",
            config.enum_file_stem(&enum_def.name),
            config.extension
        ),
        name: enum_def.name.clone(),
        values: enum_def.values.clone(),
    }
}

fn derive_outputs(
    model: &Model,
    registry: &Registry,
    config: &GeneratorConfig,
    outputs: &mut Vec<Output>,
) {
    debug!(model = %model.name, kind = ?model.kind, "deriving representations");

    // One relation-scalar map per model, shared by every representation.
    let fk_map = relation_scalar_map(model);

    for representation in representations_for(model, config.mode) {
        let derived = derive_with_map(model, registry, config, representation, &fk_map);
        let schema = config
            .validation_schemas
            .then(|| compile_schema(&derived, registry, config));

        let dir = match representation {
            Representation::Entity => &model.output.entity,
            _ => &model.output.dto,
        };
        outputs.push(Output::Model(ModelOutput {
            file_path: format!(
                "{}/{}.{}",
                dir,
                config.file_stem(representation, &model.name),
                config.extension
            ),
            representation,
            model_name: model.name.clone(),
            class_name: config.class_name(representation, &model.name),
            fields: derived.fields,
            imports: derived.imports,
            lazy_relations: derived.lazy_relations,
            schema,
        }));
    }
}

fn representations_for(model: &Model, mode: OutputMode) -> Vec<Representation> {
    Representation::ALL
        .into_iter()
        .filter(|r| model.kind == ModelKind::Model || r.applies_to_embedded())
        .filter(|r| match mode {
            OutputMode::All => true,
            OutputMode::Dto => *r != Representation::Entity,
            OutputMode::Entity => *r == Representation::Entity,
        })
        .collect()
}

/// Second classification pass: validator-schema params from the already
/// derived field set.
fn compile_schema(
    derived: &DerivedModel,
    registry: &Registry,
    config: &GeneratorConfig,
) -> ValidatorSchema {
    let representation = derived.representation;
    // Entity-style references point at the target's entity schema, except
    // embedded types, which only have a plain form. DTO-style output always
    // references the plain form.
    let namer = move |target: &str| -> String {
        let target_repr = match representation {
            Representation::Entity
                if registry
                    .model(target)
                    .is_none_or(|m| m.kind == ModelKind::Model) =>
            {
                Representation::Entity
            }
            _ => Representation::Plain,
        };
        config.schema_name(target_repr, target)
    };
    let options = CompileOptions {
        update_representation: representation == Representation::Update,
        target_schema_namer: &namer,
    };

    ValidatorSchema {
        name: config.schema_name(representation, &derived.model_name),
        fields: derived
            .fields
            .iter()
            .map(|field| SchemaField {
                name: field.name.clone(),
                expression: compile(field, &options),
            })
            .collect(),
    }
}
