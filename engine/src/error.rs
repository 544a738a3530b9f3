use thiserror::Error;

use crate::log::LogKind;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown stat '{0}' (expected skill, luck, stamina or rations)")]
    UnknownStat(String),

    /// A log payload was neither a template key nor plain text.
    #[error("cannot build a log entry from a {found} value")]
    MalformedLog { found: &'static str },

    #[error("rules are missing a template for '{0}'")]
    MissingTemplate(LogKind),

    #[error("template '{kind}' uses slot {{{index}}}, but at most 3 values are supported")]
    TemplateArity { kind: LogKind, index: usize },

    #[error("invalid rules: {0}")]
    InvalidRules(String),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}
