//! Cross-file import aggregation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One cross-file import: a source path plus the names pulled from it.
///
/// `named_imports` is an insertion-ordered set; merging never sorts, so a
/// fixed input registry always produces byte-identical output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRequirement {
    pub source_path: String,
    pub named_imports: Vec<String>,
}

impl ImportRequirement {
    pub fn new(source_path: impl Into<String>, named_import: impl Into<String>) -> Self {
        Self {
            source_path: source_path.into(),
            named_imports: vec![named_import.into()],
        }
    }
}

/// Merge requirements by exact source-path equality.
///
/// Named-import sets are unioned preserving first-seen order across the whole
/// input sequence; groups are emitted in order of each group's first
/// appearance. Idempotent: merging a merged list changes nothing.
pub fn merge_imports(requirements: &[ImportRequirement]) -> Vec<ImportRequirement> {
    let mut merged: Vec<ImportRequirement> = Vec::new();
    let mut by_path: HashMap<&str, usize> = HashMap::new();

    for req in requirements {
        let idx = match by_path.get(req.source_path.as_str()) {
            Some(&idx) => idx,
            None => {
                merged.push(ImportRequirement {
                    source_path: req.source_path.clone(),
                    named_imports: Vec::new(),
                });
                by_path.insert(req.source_path.as_str(), merged.len() - 1);
                merged.len() - 1
            }
        };
        let group = &mut merged[idx];
        for name in &req.named_imports {
            if !group.named_imports.contains(name) {
                group.named_imports.push(name.clone());
            }
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merges_same_path_unions_names() {
        let reqs = vec![
            ImportRequirement::new("./user.entity", "UserEntity"),
            ImportRequirement::new("../enums/role", "Role"),
            ImportRequirement::new("./user.entity", "UserEntitySchema"),
        ];
        let merged = merge_imports(&reqs);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].source_path, "./user.entity");
        assert_eq!(merged[0].named_imports, vec!["UserEntity", "UserEntitySchema"]);
        assert_eq!(merged[1].named_imports, vec!["Role"]);
    }

    #[test]
    fn duplicate_names_collapse() {
        let reqs = vec![
            ImportRequirement::new("./a", "A"),
            ImportRequirement::new("./a", "A"),
        ];
        let merged = merge_imports(&reqs);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].named_imports, vec!["A"]);
    }

    #[test]
    fn merge_is_idempotent() {
        let reqs = vec![
            ImportRequirement::new("./a", "A"),
            ImportRequirement::new("./b", "B"),
            ImportRequirement::new("./a", "A2"),
        ];
        let once = merge_imports(&reqs);

        let mut doubled = reqs.clone();
        doubled.extend(reqs);
        assert_eq!(merge_imports(&doubled), once);
        assert_eq!(merge_imports(&once), once);
    }

    #[test]
    fn group_order_is_first_appearance() {
        let reqs = vec![
            ImportRequirement::new("./z", "Z"),
            ImportRequirement::new("./a", "A"),
            ImportRequirement::new("./z", "Z2"),
        ];
        let merged = merge_imports(&reqs);
        assert_eq!(merged[0].source_path, "./z");
        assert_eq!(merged[1].source_path, "./a");
    }
}
