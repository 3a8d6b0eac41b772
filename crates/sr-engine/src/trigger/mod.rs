//! Comment trigger parsing.
//!
//! Every action declares a [`TriggerVocabulary`]: a table of [`TriggerDef`]
//! entries plus [`ExclusiveGroup`]s. One routine, [`parse`], turns a free-text
//! comment into a [`TriggerSet`] against any vocabulary.
//!
//! Patterns are case-insensitive regular expressions. A captured trigger's
//! pattern holds exactly one capture group. Its optional `attempt` pattern
//! detects the keyword on its own, so `OD-damage (abc)` is reported as a bad
//! value instead of being silently ignored.

pub mod common;

use std::collections::BTreeMap;

use regex::Regex;
use serde::Serialize;

use crate::error::{EngineError, EngineResult};

/// What a trigger captures from the comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capture {
    /// Presence only.
    None,
    /// A non-empty string, trimmed.
    Text,
    /// A finite decimal number.
    Number,
    /// A whole number.
    Integer,
}

/// One entry of a trigger vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerDef {
    /// Key the action looks the trigger up by.
    pub name: &'static str,
    /// Display name used in notes.
    pub label: &'static str,
    /// Regex matching the trigger, with one group when it captures.
    pub pattern: &'static str,
    /// Regex matching the bare keyword of a captured trigger.
    pub attempt: Option<&'static str>,
    /// What the pattern captures.
    pub capture: Capture,
    /// Example syntax quoted in error messages.
    pub example: &'static str,
}

impl TriggerDef {
    /// A presence-only keyword.
    pub const fn flag(name: &'static str, label: &'static str, pattern: &'static str) -> Self {
        Self {
            name,
            label,
            pattern,
            attempt: None,
            capture: Capture::None,
            example: label,
        }
    }

    /// A keyword with a parenthesised capture.
    pub const fn captured(
        name: &'static str,
        label: &'static str,
        pattern: &'static str,
        attempt: &'static str,
        capture: Capture,
        example: &'static str,
    ) -> Self {
        Self {
            name,
            label,
            pattern,
            attempt: Some(attempt),
            capture,
            example,
        }
    }
}

/// Triggers that cannot apply together, highest precedence first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExclusiveGroup {
    /// Member trigger names in precedence order.
    pub members: &'static [&'static str],
}

/// A captured trigger value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TriggerValue {
    /// The trigger was present.
    Flag,
    /// A decimal capture.
    Number(f64),
    /// A whole-number capture.
    Integer(i64),
    /// A text capture.
    Text(String),
}

#[derive(Debug, Clone)]
struct CompiledTrigger {
    def: TriggerDef,
    pattern: Regex,
    attempt: Option<Regex>,
}

/// A compiled trigger table.
#[derive(Debug, Clone)]
pub struct TriggerVocabulary {
    entries: Vec<CompiledTrigger>,
    groups: Vec<ExclusiveGroup>,
}

fn compile(pattern: &str) -> EngineResult<Regex> {
    Regex::new(&format!("(?i){pattern}"))
        .map_err(|e| EngineError::InvalidConfig(format!("trigger pattern '{pattern}': {e}")))
}

impl TriggerVocabulary {
    /// Compile `defs` and check that every group member is defined.
    pub fn new(defs: &[TriggerDef], groups: &[ExclusiveGroup]) -> EngineResult<Self> {
        let entries = defs
            .iter()
            .map(|def| {
                Ok(CompiledTrigger {
                    def: *def,
                    pattern: compile(def.pattern)?,
                    attempt: def.attempt.map(compile).transpose()?,
                })
            })
            .collect::<EngineResult<Vec<_>>>()?;

        for group in groups {
            for member in group.members {
                if !defs.iter().any(|d| d.name == *member) {
                    return Err(EngineError::InvalidConfig(format!(
                        "exclusive group names unknown trigger '{member}'"
                    )));
                }
            }
        }

        Ok(Self {
            entries,
            groups: groups.to_vec(),
        })
    }

    /// The definition registered under `name`.
    pub fn def(&self, name: &str) -> Option<&TriggerDef> {
        self.entries
            .iter()
            .map(|e| &e.def)
            .find(|d| d.name == name)
    }

    /// All definitions, in declaration order.
    pub fn defs(&self) -> impl Iterator<Item = &TriggerDef> {
        self.entries.iter().map(|e| &e.def)
    }

    /// The exclusive groups.
    pub fn groups(&self) -> &[ExclusiveGroup] {
        &self.groups
    }
}

/// The triggers found in one comment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriggerSet {
    values: BTreeMap<&'static str, TriggerValue>,
    notes: Vec<String>,
}

impl TriggerSet {
    /// Whether `name` was found.
    pub fn has(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// The captured value for `name`.
    pub fn get(&self, name: &str) -> Option<&TriggerValue> {
        self.values.get(name)
    }

    /// A numeric capture as a float, accepting integer captures too.
    pub fn number(&self, name: &str) -> Option<f64> {
        match self.values.get(name)? {
            TriggerValue::Number(n) => Some(*n),
            TriggerValue::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// An integer capture.
    pub fn integer(&self, name: &str) -> Option<i64> {
        match self.values.get(name)? {
            TriggerValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// A text capture.
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.values.get(name)? {
            TriggerValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Names of every trigger present, sorted.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.values.keys().copied()
    }

    /// Returns true if no trigger was found.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Conflict notes produced while resolving exclusive groups.
    pub fn notes(&self) -> &[String] {
        &self.notes
    }
}

/// Largest magnitude accepted for a numeric trigger parameter.
pub const MAX_CAPTURE: i64 = 1_000_000_000;

fn convert(def: &TriggerDef, raw: &str) -> EngineResult<TriggerValue> {
    let raw = raw.trim();
    let invalid = || EngineError::InvalidTriggerParameter {
        trigger: def.label.to_string(),
        value: raw.to_string(),
        example: def.example.to_string(),
    };
    match def.capture {
        Capture::None => Ok(TriggerValue::Flag),
        Capture::Text if raw.is_empty() => Err(invalid()),
        Capture::Text => Ok(TriggerValue::Text(raw.to_string())),
        Capture::Number => raw
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite() && n.abs() <= MAX_CAPTURE as f64)
            .map(TriggerValue::Number)
            .ok_or_else(invalid),
        Capture::Integer => raw
            .parse::<i64>()
            .ok()
            .filter(|n| n.unsigned_abs() <= MAX_CAPTURE.unsigned_abs())
            .map(TriggerValue::Integer)
            .ok_or_else(invalid),
    }
}

/// Scan `comment` for every trigger in `vocabulary`.
///
/// An absent or empty comment yields an empty set. Exclusive-group clashes
/// keep the highest-precedence member and attach a note; they are never
/// errors.
pub fn parse(comment: Option<&str>, vocabulary: &TriggerVocabulary) -> EngineResult<TriggerSet> {
    let mut set = TriggerSet::default();
    let Some(comment) = comment.filter(|c| !c.trim().is_empty()) else {
        return Ok(set);
    };

    for entry in &vocabulary.entries {
        let def = &entry.def;
        match entry.pattern.captures(comment) {
            Some(caps) => {
                let value = match def.capture {
                    Capture::None => TriggerValue::Flag,
                    _ => convert(def, caps.get(1).map_or("", |m| m.as_str()))?,
                };
                set.values.insert(def.name, value);
            }
            None if entry.attempt.as_ref().is_some_and(|a| a.is_match(comment)) => {
                return Err(EngineError::InvalidTriggerParameter {
                    trigger: def.label.to_string(),
                    value: String::new(),
                    example: def.example.to_string(),
                });
            }
            None => {}
        }
    }

    for group in &vocabulary.groups {
        let present: Vec<&str> = group
            .members
            .iter()
            .copied()
            .filter(|m| set.values.contains_key(m))
            .collect();
        if let [winner, losers @ ..] = present.as_slice() {
            if losers.is_empty() {
                continue;
            }
            for loser in losers {
                set.values.remove(loser);
            }
            let label = vocabulary.def(winner).map_or(*winner, |d| d.label);
            tracing::debug!(winner = label, dropped = ?losers, "exclusive triggers clashed");
            set.notes
                .push(format!("► Illegal combination! Defaulting to {label}."));
        }
    }

    Ok(set)
}

/// Require a captured trigger, reporting its example syntax when absent.
pub fn require<'a>(
    set: &'a TriggerSet,
    vocabulary: &TriggerVocabulary,
    name: &str,
) -> EngineResult<&'a TriggerValue> {
    set.get(name).ok_or_else(|| {
        let (trigger, example) = vocabulary
            .def(name)
            .map_or((name, name), |d| (d.label, d.example));
        EngineError::MissingTriggerParameter {
            trigger: trigger.to_string(),
            example: example.to_string(),
        }
    })
}
