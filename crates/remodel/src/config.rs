//! Generator configuration.
//!
//! Everything is serde-deserializable with full defaults, so a caller can
//! hand over a partial JSON/TOML config block and get sensible behavior.
//! Class/file/schema naming is centralized here; the engine never hand-rolls
//! case transforms.

use std::str::FromStr;

use convert_case::{Case, Casing};
use serde::{Deserialize, Serialize};

use crate::derive::Representation;

// ============================================================================
// Output mode
// ============================================================================

/// Which output files are produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// DTO-style and entity-style output.
    #[default]
    All,
    /// Plain/create/update/connect only.
    Dto,
    /// Entity output only. Structurally incompatible with embedded types.
    Entity,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown output mode `{0}`, expected one of: all, dto, entity")]
    UnknownMode(String),
}

impl FromStr for OutputMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(OutputMode::All),
            "dto" => Ok(OutputMode::Dto),
            "entity" => Ok(OutputMode::Entity),
            other => Err(ConfigError::UnknownMode(other.to_string())),
        }
    }
}

impl std::fmt::Display for OutputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            OutputMode::All => "all",
            OutputMode::Dto => "dto",
            OutputMode::Entity => "entity",
        })
    }
}

// ============================================================================
// Filename casing
// ============================================================================

/// Case style applied to emitted file stems.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseStyle {
    #[default]
    Kebab,
    Snake,
    Camel,
    Pascal,
}

impl CaseStyle {
    fn apply(self, input: &str) -> String {
        match self {
            CaseStyle::Kebab => input.to_case(Case::Kebab),
            CaseStyle::Snake => input.to_case(Case::Snake),
            CaseStyle::Camel => input.to_case(Case::Camel),
            CaseStyle::Pascal => input.to_case(Case::Pascal),
        }
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Prefix/suffix pair applied to one representation's class names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReprAffix {
    pub prefix: String,
    pub suffix: String,
}

impl ReprAffix {
    fn new(prefix: &str, suffix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
        }
    }
}

/// The recognized configuration surface of the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub mode: OutputMode,
    /// Emit runtime-validation schema params alongside each representation.
    pub validation_schemas: bool,
    /// Keep (as optional) create fields whose value the store would default;
    /// off means such fields are omitted from create entirely.
    pub show_default_values: bool,
    pub file_case: CaseStyle,
    /// Extension of emitted files; the rendering collaborator owns syntax,
    /// this is purely a path concern.
    pub extension: String,
    pub plain: ReprAffix,
    pub create: ReprAffix,
    pub update: ReprAffix,
    pub connect: ReprAffix,
    pub entity: ReprAffix,
    /// Appended to a class name to form its validator-schema const name.
    pub schema_suffix: String,
    /// Reference checker mode: collect every finding instead of stopping at
    /// the first one.
    pub exhaustive_relation_checks: bool,
    /// Import-path template for enum references; `{name}` is replaced with
    /// the cased enum file stem.
    pub enum_import_path: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            mode: OutputMode::All,
            validation_schemas: false,
            show_default_values: false,
            file_case: CaseStyle::Kebab,
            extension: "ts".to_string(),
            plain: ReprAffix::new("", "Dto"),
            create: ReprAffix::new("Create", "Dto"),
            update: ReprAffix::new("Update", "Dto"),
            connect: ReprAffix::new("Connect", "Dto"),
            entity: ReprAffix::new("", "Entity"),
            schema_suffix: "Schema".to_string(),
            exhaustive_relation_checks: false,
            enum_import_path: "../enums/{name}".to_string(),
        }
    }
}

impl GeneratorConfig {
    pub fn affix(&self, representation: Representation) -> &ReprAffix {
        match representation {
            Representation::Plain => &self.plain,
            Representation::Create => &self.create,
            Representation::Update => &self.update,
            Representation::Connect => &self.connect,
            Representation::Entity => &self.entity,
        }
    }

    /// `Create` + `User` + `Dto` → `CreateUserDto`.
    pub fn class_name(&self, representation: Representation, model_name: &str) -> String {
        let affix = self.affix(representation);
        format!(
            "{}{}{}",
            affix.prefix,
            model_name.to_case(Case::Pascal),
            affix.suffix
        )
    }

    /// The class name in the configured file case, e.g. `create-user-dto`.
    pub fn file_stem(&self, representation: Representation, model_name: &str) -> String {
        self.file_case.apply(&self.class_name(representation, model_name))
    }

    /// Validator-schema const name, e.g. `CreateUserDtoSchema`.
    pub fn schema_name(&self, representation: Representation, model_name: &str) -> String {
        format!(
            "{}{}",
            self.class_name(representation, model_name),
            self.schema_suffix
        )
    }

    pub fn enum_file_stem(&self, enum_name: &str) -> String {
        self.file_case.apply(enum_name)
    }

    /// Resolved import path for an enum reference.
    pub fn enum_import(&self, enum_name: &str) -> String {
        self.enum_import_path
            .replace("{name}", &self.enum_file_stem(enum_name))
    }
}
