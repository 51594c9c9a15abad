//! Typed annotation parsing.
//!
//! Source schemas attach free-text documentation to fields and models.
//! Recognized `@tag` / `@tag(arg)` markers inside that text control how a
//! field appears in each derived representation. The text is scanned exactly
//! once into an [`AnnotationSet`]; every downstream predicate consults the
//! typed set instead of re-matching strings.
//!
//! Parsing is total: malformed or unrecognized markers never fail, they are
//! kept as [`Annotation::Unknown`] so renderers can pass them through.

use serde::{Deserialize, Serialize};

/// A recognized annotation tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tag {
    /// Hide the field from the entity representation.
    EntityHidden,
    /// Hide the field from the create representation.
    CreateHidden,
    /// Hide the field from the update representation.
    UpdateHidden,
    /// Force the field optional in the create representation.
    CreateOptional,
    /// Force the field into the create representation, required.
    CreateRequired,
    /// Force the field required in the update representation.
    UpdateRequired,
    /// Mark a relation as required in the entity representation.
    RelationRequired,
    /// Surface the relation's foreign-key scalar in plain/create/update.
    RelationIncludeId,
    /// Replace the emitted type with the literal argument.
    TypeOverride,
    /// Cast the emitted type to the literal argument.
    TypeCast,
}

impl Tag {
    /// The keyword as written after `@` in documentation text.
    pub fn keyword(self) -> &'static str {
        match self {
            Tag::EntityHidden => "entityHidden",
            Tag::CreateHidden => "createHidden",
            Tag::UpdateHidden => "updateHidden",
            Tag::CreateOptional => "createOptional",
            Tag::CreateRequired => "createRequired",
            Tag::UpdateRequired => "updateRequired",
            Tag::RelationRequired => "relationRequired",
            Tag::RelationIncludeId => "relationIncludeId",
            Tag::TypeOverride => "typeOverride",
            Tag::TypeCast => "typeCast",
        }
    }

    fn from_keyword(word: &str) -> Option<Self> {
        const ALL: &[Tag] = &[
            Tag::EntityHidden,
            Tag::CreateHidden,
            Tag::UpdateHidden,
            Tag::CreateOptional,
            Tag::CreateRequired,
            Tag::UpdateRequired,
            Tag::RelationRequired,
            Tag::RelationIncludeId,
            Tag::TypeOverride,
            Tag::TypeCast,
        ];
        ALL.iter().copied().find(|t| t.keyword() == word)
    }
}

/// One marker found in documentation text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Annotation {
    Recognized {
        tag: Tag,
        argument: Option<String>,
    },
    /// An `@word` the engine does not know. Preserved verbatim.
    Unknown {
        tag: String,
        argument: Option<String>,
    },
}

/// All annotations attached to one field or model, in source order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationSet {
    entries: Vec<Annotation>,
}

impl AnnotationSet {
    /// Scan documentation text for `@tag` / `@tag(arg)` markers.
    pub fn parse(documentation: Option<&str>) -> Self {
        let mut entries = Vec::new();
        let Some(text) = documentation else {
            return Self { entries };
        };

        let bytes = text.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i] != b'@' {
                i += 1;
                continue;
            }
            let start = i + 1;
            let mut end = start;
            while end < bytes.len() && (bytes[end].is_ascii_alphanumeric() || bytes[end] == b'_') {
                end += 1;
            }
            if end == start {
                // A lone '@' (e.g. in an email address fragment).
                i += 1;
                continue;
            }
            let word = &text[start..end];

            let mut argument = None;
            let mut next = end;
            if bytes.get(end) == Some(&b'(') {
                if let Some(close) = text[end + 1..].find(')') {
                    let raw = text[end + 1..end + 1 + close].trim();
                    if !raw.is_empty() {
                        argument = Some(raw.to_string());
                    }
                    next = end + 1 + close + 1;
                }
                // An unclosed '(' leaves the marker argument-less.
            }

            entries.push(match Tag::from_keyword(word) {
                Some(tag) => Annotation::Recognized { tag, argument },
                None => Annotation::Unknown {
                    tag: word.to_string(),
                    argument,
                },
            });
            i = next.max(end);
        }

        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Annotation] {
        &self.entries
    }

    /// Whether the given recognized tag is present.
    pub fn has(&self, tag: Tag) -> bool {
        self.entries
            .iter()
            .any(|a| matches!(a, Annotation::Recognized { tag: t, .. } if *t == tag))
    }

    /// The first argument attached to the given tag, if any.
    pub fn argument(&self, tag: Tag) -> Option<&str> {
        self.entries.iter().find_map(|a| match a {
            Annotation::Recognized {
                tag: t,
                argument: Some(arg),
            } if *t == tag => Some(arg.as_str()),
            _ => None,
        })
    }

    /// The literal replacement type from `@typeOverride(T)` or `@typeCast(T)`.
    ///
    /// Either tag short-circuits relation/enum reference handling: the field's
    /// emitted type becomes an opaque literal supplied by the schema author.
    pub fn custom_type(&self) -> Option<&str> {
        self.argument(Tag::TypeOverride)
            .or_else(|| self.argument(Tag::TypeCast))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_docs_parse_to_empty_set() {
        assert!(AnnotationSet::parse(None).is_empty());
        assert!(AnnotationSet::parse(Some("just a comment")).is_empty());
    }

    #[test]
    fn recognizes_bare_tags() {
        let set = AnnotationSet::parse(Some("The author relation.\n@relationRequired"));
        assert!(set.has(Tag::RelationRequired));
        assert!(!set.has(Tag::EntityHidden));
    }

    #[test]
    fn multiple_tags_coexist() {
        let set = AnnotationSet::parse(Some("@createHidden @updateHidden"));
        assert!(set.has(Tag::CreateHidden));
        assert!(set.has(Tag::UpdateHidden));
        assert_eq!(set.entries().len(), 2);
    }

    #[test]
    fn parses_arguments() {
        let set = AnnotationSet::parse(Some("@typeOverride(Decimal.js)"));
        assert_eq!(set.argument(Tag::TypeOverride), Some("Decimal.js"));
        assert_eq!(set.custom_type(), Some("Decimal.js"));
    }

    #[test]
    fn cast_also_supplies_custom_type() {
        let set = AnnotationSet::parse(Some("@typeCast(bigint)"));
        assert_eq!(set.custom_type(), Some("bigint"));
    }

    #[test]
    fn unknown_tags_are_preserved() {
        let set = AnnotationSet::parse(Some("@deprecated(use v2) @createHidden"));
        assert!(set.has(Tag::CreateHidden));
        assert_eq!(
            set.entries()[0],
            Annotation::Unknown {
                tag: "deprecated".to_string(),
                argument: Some("use v2".to_string()),
            }
        );
    }

    #[test]
    fn lone_at_sign_is_not_a_marker() {
        let set = AnnotationSet::parse(Some("contact admin@ for help"));
        assert!(set.is_empty());
    }

    #[test]
    fn unclosed_parenthesis_keeps_bare_tag() {
        let set = AnnotationSet::parse(Some("@typeOverride(oops"));
        assert!(set.has(Tag::TypeOverride));
        assert_eq!(set.custom_type(), None);
    }
}
