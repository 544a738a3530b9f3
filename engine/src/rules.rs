use std::{fs, path::Path};

use anyhow::{Context, Result};
use encoding_rs::Encoding;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::character::Stats;
use crate::log::{LogKind, LogTemplates};
use crate::EngineError;

/// House rules for a session: constants, starting values and the log
/// template table. Handed to every component that needs them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRules")]
pub struct Rules {
    /// Logbook entries shown at once.
    pub num_logs: usize,
    /// Cap on stored logbook entries; `None` keeps everything.
    pub retention: Option<usize>,
    pub std_dmg: i32,
    pub change_on_luck: i32,
    pub ration_restores: i32,
    pub default_stats: Stats,
    pub default_name: String,
    pub enemy_name: String,
    pub inventory_text: String,
    pub templates: LogTemplates,
}

/// Rules as written in YAML, before the template table is checked.
#[derive(Deserialize)]
struct RawRules {
    num_logs: usize,
    #[serde(default)]
    retention: Option<usize>,
    std_dmg: i32,
    change_on_luck: i32,
    ration_restores: i32,
    default_stats: Stats,
    default_name: String,
    enemy_name: String,
    #[serde(default)]
    inventory_text: String,
    templates: IndexMap<LogKind, String>,
}

impl TryFrom<RawRules> for Rules {
    type Error = EngineError;

    fn try_from(raw: RawRules) -> Result<Self, Self::Error> {
        let rules = Rules {
            num_logs: raw.num_logs,
            retention: raw.retention,
            std_dmg: raw.std_dmg,
            change_on_luck: raw.change_on_luck,
            ration_restores: raw.ration_restores,
            default_stats: raw.default_stats,
            default_name: raw.default_name,
            enemy_name: raw.enemy_name,
            inventory_text: raw.inventory_text,
            templates: LogTemplates::try_from(raw.templates)?,
        };
        rules.validate()?;
        Ok(rules)
    }
}

impl Rules {
    pub fn builtin() -> Result<Self, EngineError> {
        Self::from_yaml_str(crate::content::builtin_rules())
    }

    /// Template problems come back as [`EngineError::MissingTemplate`] or
    /// [`EngineError::TemplateArity`], not wrapped in a YAML error.
    pub fn from_yaml_str(text: &str) -> Result<Self, EngineError> {
        let raw: RawRules = serde_yaml::from_str(text)?;
        Self::try_from(raw)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = read_text_auto(path)
            .with_context(|| format!("failed to read rules YAML: {}", path.display()))?;
        Self::from_yaml_str(&text)
            .with_context(|| format!("failed to parse rules YAML: {}", path.display()))
    }

    fn validate(&self) -> Result<(), EngineError> {
        if self.num_logs == 0 {
            return Err(EngineError::InvalidRules(
                "num_logs must be at least 1".to_string(),
            ));
        }
        if let Some(cap) = self.retention {
            if cap < self.num_logs {
                return Err(EngineError::InvalidRules(format!(
                    "retention ({}) must not be smaller than num_logs ({})",
                    cap, self.num_logs
                )));
            }
        }
        Ok(())
    }
}

/// Reads a text file, honouring a UTF-8 or UTF-16 byte order mark.
/// Without one the bytes must be UTF-8.
pub fn read_text_auto(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    if let Some((enc, bom_len)) = Encoding::for_bom(&bytes) {
        let (cow, _, _) = enc.decode(&bytes[bom_len..]);
        Ok(cow.into_owned())
    } else {
        String::from_utf8(bytes).with_context(|| format!("{} is not UTF-8", path.display()))
    }
}
