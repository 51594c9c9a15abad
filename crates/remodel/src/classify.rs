//! Field classification predicates.
//!
//! Pure, total, side-effect-free decisions over a field's structural metadata
//! and its typed annotations. Everything above this module (derivers,
//! compiler, orchestrator) consumes these instead of poking at raw flags.

use remodel_schema::{Field, FieldKind, ModelKind, Registry, Tag};

pub fn is_id(field: &Field) -> bool {
    field.is_id
}

pub fn is_unique(field: &Field) -> bool {
    field.is_unique
}

pub fn is_read_only(field: &Field) -> bool {
    field.is_read_only
}

pub fn is_updated_at(field: &Field) -> bool {
    field.is_updated_at
}

/// An object-kind field targeting an embedded type in the registry.
pub fn is_embedded_type(field: &Field, registry: &Registry) -> bool {
    field.kind == FieldKind::Object
        && registry
            .model(&field.type_name)
            .is_some_and(|m| m.kind == ModelKind::Type)
}

/// An object-kind field targeting a proper model.
///
/// An object field whose target is absent from the registry still classifies
/// as a relation: it keeps its deferred-reference shape, it just resolves to
/// nothing (partial-schema inputs stay generatable).
pub fn is_relation(field: &Field, registry: &Registry) -> bool {
    field.kind == FieldKind::Object && !is_embedded_type(field, registry)
}

/// Whether the field carries a default the engine recognizes.
///
/// Unknown generator names classify as "no default".
pub fn has_default(field: &Field) -> bool {
    field.default.as_ref().is_some_and(|d| d.is_recognized())
}

/// An id the store assigns itself (auto-increment, uuid generation, ...).
/// Such fields are omitted from create representations.
pub fn is_id_with_default(field: &Field) -> bool {
    field.is_id && has_default(field)
}

/// Schema-required with a default, but not an id.
///
/// Whether these surface in create output is governed by the
/// `show_default_values` configuration toggle.
pub fn is_required_with_default(field: &Field) -> bool {
    field.is_required && !field.is_id && has_default(field)
}

pub fn is_annotated_with(field: &Field, tag: Tag) -> bool {
    field.annotations().has(tag)
}
