//! Representation derivers.
//!
//! One parameterized algorithm walks a model's fields and, per target
//! representation, decides inclusion, computes the representation-local
//! required/nullable overrides, and collects cross-model import requirements
//! plus lazy-relation markers. The five representations differ only in their
//! policy, selected by [`Representation`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use remodel_schema::{Field, FieldKind, Model, ModelKind, Registry, Tag};

use crate::classify;
use crate::config::GeneratorConfig;
use crate::imports::{ImportRequirement, merge_imports};
use crate::parsed::{FieldOverrides, ParsedField};

// ============================================================================
// Representation
// ============================================================================

/// A derived shape of a model for one use case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Representation {
    /// Value object: scalars and embedded data, no relations.
    Plain,
    /// Input object for creation; store-assigned fields omitted.
    Create,
    /// Input object for updates; blanket-optional, ids omitted.
    Update,
    /// Reference object identifying one record by id/unique fields.
    Connect,
    /// Full object including relations.
    Entity,
}

impl Representation {
    pub const ALL: [Representation; 5] = [
        Representation::Plain,
        Representation::Create,
        Representation::Update,
        Representation::Connect,
        Representation::Entity,
    ];

    /// Embedded types have no identity, so no connect or entity shape.
    pub fn applies_to_embedded(self) -> bool {
        matches!(
            self,
            Representation::Plain | Representation::Create | Representation::Update
        )
    }
}

impl std::fmt::Display for Representation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Representation::Plain => "plain",
            Representation::Create => "create",
            Representation::Update => "update",
            Representation::Connect => "connect",
            Representation::Entity => "entity",
        })
    }
}

/// One derived representation of one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedModel {
    pub model_name: String,
    pub representation: Representation,
    pub fields: Vec<ParsedField>,
    pub imports: Vec<ImportRequirement>,
    /// Target model names whose references must be deferred at render time
    /// (forward/mutual references). Self-references never appear here.
    pub lazy_relations: Vec<String>,
}

// ============================================================================
// Relation-scalar map
// ============================================================================

/// For one model: FK scalar field name → names of the relation fields backed
/// by it. Computed once per model, consumed by every representation.
pub fn relation_scalar_map(model: &Model) -> HashMap<String, Vec<String>> {
    let mut map: HashMap<String, Vec<String>> = HashMap::new();
    for field in &model.fields {
        if field.kind == FieldKind::Object {
            for fk in &field.relation_from_fields {
                map.entry(fk.clone()).or_default().push(field.name.clone());
            }
        }
    }
    map
}

/// Disjunction over the relation fields a FK scalar backs: the scalar is
/// required iff ANY backing relation is schema-required or tagged required.
fn backing_relations_required(model: &Model, backing: &[String]) -> bool {
    model
        .fields
        .iter()
        .filter(|f| backing.iter().any(|name| *name == f.name))
        .any(|r| r.is_required || r.annotations().has(Tag::RelationRequired))
}

// ============================================================================
// Deriver
// ============================================================================

/// What the policy decided for one field.
struct Inclusion {
    overrides: FieldOverrides,
    /// Clear the read-only marker on the materialized field (tagged FK
    /// scalars surfaced into writable representations).
    force_writable: bool,
}

impl Inclusion {
    fn with(overrides: FieldOverrides) -> Option<Self> {
        Some(Self {
            overrides,
            force_writable: false,
        })
    }

    fn writable(overrides: FieldOverrides) -> Option<Self> {
        Some(Self {
            overrides,
            force_writable: true,
        })
    }
}

/// Derive one representation of `model` against the full registry.
pub fn derive_model(
    model: &Model,
    registry: &Registry,
    config: &GeneratorConfig,
    representation: Representation,
) -> DerivedModel {
    derive_with_map(model, registry, config, representation, &relation_scalar_map(model))
}

/// Deriver entry point for callers that computed the relation-scalar map
/// once and reuse it across representations.
pub(crate) fn derive_with_map(
    model: &Model,
    registry: &Registry,
    config: &GeneratorConfig,
    representation: Representation,
    fk_map: &HashMap<String, Vec<String>>,
) -> DerivedModel {
    let connect_candidates = model
        .fields
        .iter()
        .filter(|f| f.is_id || f.is_unique)
        .count();

    let mut fields = Vec::new();
    let mut imports = Vec::new();
    let mut lazy_relations = Vec::new();

    for field in &model.fields {
        let decision = match representation {
            Representation::Plain => plain_inclusion(field, model, registry, fk_map),
            Representation::Create => create_inclusion(field, model, registry, config, fk_map),
            Representation::Update => update_inclusion(field, model, registry, fk_map),
            Representation::Connect => connect_inclusion(field, connect_candidates),
            Representation::Entity => entity_inclusion(field, model, registry, fk_map),
        };
        let Some(inclusion) = decision else {
            continue;
        };

        let mut parsed = ParsedField::materialize(field, inclusion.overrides, &model.name);
        if inclusion.force_writable {
            parsed = parsed.writable();
        }
        collect_references(field, model, registry, config, &mut imports, &mut lazy_relations);
        fields.push(parsed);
    }

    DerivedModel {
        model_name: model.name.clone(),
        representation,
        fields,
        imports: merge_imports(&imports),
        lazy_relations,
    }
}

// ============================================================================
// Per-representation policies
// ============================================================================

fn entity_inclusion(
    field: &Field,
    model: &Model,
    registry: &Registry,
    fk_map: &HashMap<String, Vec<String>>,
) -> Option<Inclusion> {
    let ann = field.annotations();
    if ann.has(Tag::EntityHidden) {
        return None;
    }

    let required = if classify::is_relation(field, registry) {
        // Relations are opt-in required; list relations never are.
        !field.is_list && ann.has(Tag::RelationRequired)
    } else if let Some(backing) = fk_map.get(&field.name) {
        // FK scalars mirror the requiredness of the relations they back.
        backing_relations_required(model, backing)
    } else {
        field.is_required
    };
    // Lists are never nullable; otherwise nullable is the exact complement.
    let nullable = !required && !field.is_list;
    Inclusion::with(FieldOverrides::new(required, nullable))
}

fn plain_inclusion(
    field: &Field,
    model: &Model,
    registry: &Registry,
    fk_map: &HashMap<String, Vec<String>>,
) -> Option<Inclusion> {
    if classify::is_relation(field, registry) {
        return None;
    }
    if let Some(backing) = fk_map.get(&field.name) {
        if !field.annotations().has(Tag::RelationIncludeId) {
            return None;
        }
        let required = backing_relations_required(model, backing);
        return Inclusion::with(FieldOverrides::required(required));
    }
    Inclusion::with(FieldOverrides::default())
}

fn create_inclusion(
    field: &Field,
    model: &Model,
    registry: &Registry,
    config: &GeneratorConfig,
    fk_map: &HashMap<String, Vec<String>>,
) -> Option<Inclusion> {
    let ann = field.annotations();
    if classify::is_relation(field, registry) {
        return None;
    }
    if let Some(backing) = fk_map.get(&field.name) {
        if !ann.has(Tag::RelationIncludeId) {
            return None;
        }
        let required = backing_relations_required(model, backing);
        return Inclusion::writable(FieldOverrides::required(required));
    }
    if classify::is_read_only(field) || ann.has(Tag::CreateHidden) || classify::is_updated_at(field)
    {
        return None;
    }
    // Store-assigned ids stay out unless an override tag pulls them back in.
    if classify::is_id_with_default(field)
        && !ann.has(Tag::CreateOptional)
        && !ann.has(Tag::CreateRequired)
    {
        return None;
    }
    if classify::is_required_with_default(field) && !config.show_default_values {
        return None;
    }

    let required = if ann.has(Tag::CreateRequired) {
        true
    } else if ann.has(Tag::CreateOptional) {
        false
    } else if classify::is_required_with_default(field) {
        // Surfaced because show_default_values is on; the store still has a
        // value for it, so the caller may leave it out.
        false
    } else {
        field.is_required
    };
    Inclusion::with(FieldOverrides::required(required))
}

fn update_inclusion(
    field: &Field,
    model: &Model,
    registry: &Registry,
    fk_map: &HashMap<String, Vec<String>>,
) -> Option<Inclusion> {
    let ann = field.annotations();
    if field.is_id {
        // Ids are immutable.
        return None;
    }
    if classify::is_relation(field, registry) {
        return None;
    }
    if let Some(backing) = fk_map.get(&field.name) {
        if !ann.has(Tag::RelationIncludeId) {
            return None;
        }
        let required = backing_relations_required(model, backing);
        return Inclusion::writable(FieldOverrides::required(required));
    }
    if classify::is_read_only(field) || ann.has(Tag::UpdateHidden) {
        return None;
    }
    // Blanket optional unless explicitly forced.
    let required = ann.has(Tag::UpdateRequired);
    Inclusion::with(FieldOverrides::required(required))
}

fn connect_inclusion(field: &Field, candidates: usize) -> Option<Inclusion> {
    if !field.is_id && !field.is_unique {
        return None;
    }
    // A single candidate identifies the record on its own and is required.
    // With several, all become optional (never nullable): the caller must
    // supply exactly one of them to disambiguate identity.
    let single = candidates == 1;
    Inclusion::with(FieldOverrides::new(single, false))
}

// ============================================================================
// Reference collection
// ============================================================================

fn collect_references(
    field: &Field,
    model: &Model,
    registry: &Registry,
    config: &GeneratorConfig,
    imports: &mut Vec<ImportRequirement>,
    lazy_relations: &mut Vec<String>,
) {
    // A custom-type tag makes the emitted type an opaque literal; no import,
    // no deferred reference.
    if field.annotations().custom_type().is_some() {
        return;
    }

    match field.kind {
        FieldKind::Object => {
            if field.type_name == model.name {
                // Self-reference: same file, nothing to import.
                return;
            }
            let Some(target) = registry.model(&field.type_name) else {
                warn!(
                    model = %model.name,
                    field = %field.name,
                    target = %field.type_name,
                    "field references a model absent from the registry; no import generated"
                );
                return;
            };
            // Relations point at the target's entity form, embedded types at
            // its plain form.
            let (repr, dir) = match target.kind {
                ModelKind::Type => (Representation::Plain, &target.output.dto),
                ModelKind::Model => (Representation::Entity, &target.output.entity),
            };
            let path = format!("{}/{}", dir, config.file_stem(repr, &target.name));
            imports.push(ImportRequirement::new(
                path.clone(),
                config.class_name(repr, &target.name),
            ));
            if config.validation_schemas {
                imports.push(ImportRequirement::new(
                    path,
                    config.schema_name(repr, &target.name),
                ));
            }
            if !lazy_relations.contains(&target.name) {
                lazy_relations.push(target.name.clone());
            }
        }
        FieldKind::Enum => {
            imports.push(ImportRequirement::new(
                config.enum_import(&field.type_name),
                field.type_name.clone(),
            ));
        }
        FieldKind::Scalar => {}
    }
}

// ============================================================================
// Tests
// ============================================================================
