//! Registry reference checker.
//!
//! Advisory pass over a registry before derivation: dangling references stay
//! non-fatal (partial-schema inputs must still generate something
//! inspectable), but they are worth surfacing. The orchestrator logs each
//! finding and carries on.

use remodel_schema::{FieldKind, Registry};

/// One advisory finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub model: String,
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}: {}", self.model, self.field, self.message)
    }
}

/// Check every cross-reference in the registry.
///
/// `exhaustive` collects all findings; otherwise the pass stops at the first
/// one (cheap mode for large registries on hot regeneration paths).
pub fn check_references(registry: &Registry, exhaustive: bool) -> Vec<Finding> {
    let mut findings = Vec::new();

    for model in &registry.models {
        for field in &model.fields {
            match field.kind {
                FieldKind::Object => {
                    if registry.model(&field.type_name).is_none() {
                        findings.push(Finding {
                            model: model.name.clone(),
                            field: field.name.clone(),
                            message: format!(
                                "references `{}`, which is not in the registry",
                                field.type_name
                            ),
                        });
                        if !exhaustive {
                            return findings;
                        }
                    }
                    for fk in &field.relation_from_fields {
                        if model.field(fk).is_none() {
                            findings.push(Finding {
                                model: model.name.clone(),
                                field: field.name.clone(),
                                message: format!(
                                    "names `{fk}` as its foreign-key scalar, but the model has no such field"
                                ),
                            });
                            if !exhaustive {
                                return findings;
                            }
                        }
                    }
                }
                FieldKind::Enum => {
                    if registry.enum_def(&field.type_name).is_none() {
                        findings.push(Finding {
                            model: model.name.clone(),
                            field: field.name.clone(),
                            message: format!(
                                "references enum `{}`, which is not in the registry",
                                field.type_name
                            ),
                        });
                        if !exhaustive {
                            return findings;
                        }
                    }
                }
                FieldKind::Scalar => {}
            }
        }
    }

    findings
}
