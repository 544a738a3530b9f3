//! Logbook entries.
//!
//! A [`Log`] is one immutable line (or block) of text. Most are built from a
//! named template in [`LogTemplates`] with up to three positional values;
//! anything else is taken verbatim. Compound lines are built by chaining
//! [`Log::append_log`].

use std::fmt::{self, Display};
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::EngineError;

/// Templates never use more than this many positional slots.
pub const MAX_FORMAT_ARGS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogKind {
    Space,
    Eat,
    RollDie,
    RollDieExt,
    TotalRoll,
    AttackVal,
    TakeDmg,
    Draw,
    RollLuck,
    LessDmg,
    MoreDmg,
    Success,
    Failure,
    StatUp,
    StatDown,
    Refresh,
    Battle,
    NewStats,
    ClearPot,
    Unchanged,
    ErrDraw,
    ErrNoFight,
    Options,
}

impl LogKind {
    pub const ALL: [LogKind; 23] = [
        LogKind::Space,
        LogKind::Eat,
        LogKind::RollDie,
        LogKind::RollDieExt,
        LogKind::TotalRoll,
        LogKind::AttackVal,
        LogKind::TakeDmg,
        LogKind::Draw,
        LogKind::RollLuck,
        LogKind::LessDmg,
        LogKind::MoreDmg,
        LogKind::Success,
        LogKind::Failure,
        LogKind::StatUp,
        LogKind::StatDown,
        LogKind::Refresh,
        LogKind::Battle,
        LogKind::NewStats,
        LogKind::ClearPot,
        LogKind::Unchanged,
        LogKind::ErrDraw,
        LogKind::ErrNoFight,
        LogKind::Options,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LogKind::Space => "space",
            LogKind::Eat => "eat",
            LogKind::RollDie => "roll_die",
            LogKind::RollDieExt => "roll_die_ext",
            LogKind::TotalRoll => "total_roll",
            LogKind::AttackVal => "attack_val",
            LogKind::TakeDmg => "take_dmg",
            LogKind::Draw => "draw",
            LogKind::RollLuck => "roll_luck",
            LogKind::LessDmg => "less_dmg",
            LogKind::MoreDmg => "more_dmg",
            LogKind::Success => "success",
            LogKind::Failure => "failure",
            LogKind::StatUp => "stat_up",
            LogKind::StatDown => "stat_down",
            LogKind::Refresh => "refresh",
            LogKind::Battle => "battle",
            LogKind::NewStats => "new_stats",
            LogKind::ClearPot => "clear_pot",
            LogKind::Unchanged => "unchanged",
            LogKind::ErrDraw => "err_draw",
            LogKind::ErrNoFight => "err_no_fight",
            LogKind::Options => "options",
        }
    }
}

impl Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exact, case-sensitive match on the template key.
impl FromStr for LogKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or(())
    }
}

/// Template table keyed by [`LogKind`]. Always complete: deserializing or
/// converting a map that lacks a kind, or that uses a slot past
/// [`MAX_FORMAT_ARGS`], fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "IndexMap<LogKind, String>", into = "IndexMap<LogKind, String>")]
pub struct LogTemplates {
    table: IndexMap<LogKind, String>,
}

impl LogTemplates {
    pub fn get(&self, kind: LogKind) -> &str {
        self.table.get(&kind).map_or("", String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (LogKind, &str)> {
        self.table.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

impl TryFrom<IndexMap<LogKind, String>> for LogTemplates {
    type Error = EngineError;

    fn try_from(table: IndexMap<LogKind, String>) -> Result<Self, Self::Error> {
        for kind in LogKind::ALL {
            let template = table.get(&kind).ok_or(EngineError::MissingTemplate(kind))?;
            if let Some(index) = slots(template).find(|&i| i >= MAX_FORMAT_ARGS) {
                return Err(EngineError::TemplateArity { kind, index });
            }
        }
        Ok(Self { table })
    }
}

impl From<LogTemplates> for IndexMap<LogKind, String> {
    fn from(templates: LogTemplates) -> Self {
        templates.table
    }
}

/// One logbook entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Log {
    log_string: String,
}

impl Log {
    /// Fill the template for `kind`. Values past the slots a template uses
    /// are ignored; slots without a value render empty.
    pub fn standard(templates: &LogTemplates, kind: LogKind, args: &[&dyn Display]) -> Self {
        let values: Vec<String> = args
            .iter()
            .take(MAX_FORMAT_ARGS)
            .map(|a| a.to_string())
            .collect();
        Self {
            log_string: fill(templates.get(kind), &values),
        }
    }

    pub fn literal(text: impl Into<String>) -> Self {
        Self {
            log_string: text.into(),
        }
    }

    /// Template lookup when `key` names a kind, otherwise `key` verbatim.
    pub fn from_key(key: &str, args: &[&dyn Display], templates: &LogTemplates) -> Self {
        match key.parse::<LogKind>() {
            Ok(kind) => Self::standard(templates, kind, args),
            Err(()) => Self::literal(key),
        }
    }

    /// Build from a loosely typed payload, as handed over by a front end.
    /// Only strings are accepted.
    pub fn from_payload(
        payload: &Value,
        args: &[&dyn Display],
        templates: &LogTemplates,
    ) -> Result<Self, EngineError> {
        match payload {
            Value::String(key) => Ok(Self::from_key(key, args, templates)),
            other => Err(EngineError::MalformedLog {
                found: value_kind(other),
            }),
        }
    }

    /// `self` immediately followed by `other`, no separator.
    pub fn append_log(&self, other: &Log) -> Log {
        let mut log_string = String::with_capacity(self.log_string.len() + other.log_string.len());
        log_string.push_str(&self.log_string);
        log_string.push_str(&other.log_string);
        Log { log_string }
    }

    /// `self` and `other` on separate lines.
    pub fn add_newline_log(&self, other: &Log) -> Log {
        Log {
            log_string: format!("{}\n{}", self.log_string, other.log_string),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.log_string
    }
}

impl Display for Log {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.log_string)
    }
}

fn value_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A template split into literal text and positional slots. `{{` and `}}`
/// stand for literal braces; a `{` that opens no `{n}` slot is kept as is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Piece<'a> {
    Text(&'a str),
    Slot(usize),
}

fn pieces(template: &str) -> Vec<Piece<'_>> {
    let mut out = Vec::new();
    let mut rest = template;
    while let Some(at) = rest.find(['{', '}']) {
        if at > 0 {
            out.push(Piece::Text(&rest[..at]));
        }
        let tail = &rest[at..];
        if tail.starts_with("{{") || tail.starts_with("}}") {
            out.push(Piece::Text(&tail[..1]));
            rest = &tail[2..];
            continue;
        }
        if let Some((index, len)) = tail.strip_prefix('{').and_then(slot_at) {
            out.push(Piece::Slot(index));
            rest = &tail[1 + len..];
            continue;
        }
        out.push(Piece::Text(&tail[..1]));
        rest = &tail[1..];
    }
    if !rest.is_empty() {
        out.push(Piece::Text(rest));
    }
    out
}

/// `after` follows an opening brace: `3}...` gives the index and the length
/// through the closing brace.
fn slot_at(after: &str) -> Option<(usize, usize)> {
    let close = after.find('}')?;
    let index = after[..close].parse::<usize>().ok()?;
    Some((index, close + 1))
}

/// Positional slot indices referenced by `template`, in order of appearance.
fn slots(template: &str) -> impl Iterator<Item = usize> + '_ {
    pieces(template).into_iter().filter_map(|piece| match piece {
        Piece::Slot(index) => Some(index),
        Piece::Text(_) => None,
    })
}

fn fill(template: &str, values: &[String]) -> String {
    let mut out = String::with_capacity(template.len());
    for piece in pieces(template) {
        match piece {
            Piece::Text(text) => out.push_str(text),
            Piece::Slot(index) => {
                if let Some(value) = values.get(index) {
                    out.push_str(value);
                }
            }
        }
    }
    out
}
