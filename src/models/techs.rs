// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Technology entries: the editable list with stable row identities and its validation.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::config::TechRules;
use crate::models::field_error::{FieldError, FieldErrors};

/// One technology row as typed by the user. Knowledge stays raw text until validation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TechEntry {
    pub title: String,
    #[serde(deserialize_with = "knowledge_from_json")]
    pub knowledge: String,
}

impl TechEntry {
    pub fn new(title: impl Into<String>, knowledge: impl ToString) -> Self {
        Self {
            title: title.into(),
            knowledge: knowledge.to_string(),
        }
    }
}

impl Default for TechEntry {
    fn default() -> Self {
        Self::new("", 0)
    }
}

/// Accept either a JSON number or a string for the knowledge level.
fn knowledge_from_json<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// Identity of a row, independent of its position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TechId(Uuid);

impl TechId {
    fn fresh() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for TechId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ordered rows, each slot tagged with an identity minted on insertion.
///
/// Removing a row never renumbers the identities of the others.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TechList {
    slots: Vec<(TechId, TechEntry)>,
}

impl TechList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a blank row (`title: ""`, `knowledge: "0"`) and return its identity.
    pub fn append(&mut self) -> TechId {
        self.push(TechEntry::default())
    }

    /// Append a given row and return its identity.
    pub fn push(&mut self, entry: TechEntry) -> TechId {
        let id = TechId::fresh();
        self.slots.push((id, entry));
        id
    }

    /// Remove the row at `index`. Out-of-range indices leave the list untouched.
    pub fn remove(&mut self, index: usize) -> Option<(TechId, TechEntry)> {
        if index < self.slots.len() {
            Some(self.slots.remove(index))
        } else {
            None
        }
    }

    pub fn get(&self, index: usize) -> Option<&TechEntry> {
        self.slots.get(index).map(|(_, e)| e)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut TechEntry> {
        self.slots.get_mut(index).map(|(_, e)| e)
    }

    pub fn id_at(&self, index: usize) -> Option<TechId> {
        self.slots.get(index).map(|(id, _)| *id)
    }

    /// Current position of the row with identity `id`.
    pub fn position(&self, id: TechId) -> Option<usize> {
        self.slots.iter().position(|(slot, _)| *slot == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (TechId, &TechEntry)> {
        self.slots.iter().map(|(id, e)| (*id, e))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Snapshot of the rows in order, without identities.
    pub fn entries(&self) -> Vec<TechEntry> {
        self.slots.iter().map(|(_, e)| e.clone()).collect()
    }
}

/// A validated technology row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidTech {
    pub title: String,
    pub knowledge: i64,
}

/// Coerce typed text into a whole number. Blank text counts as zero.
pub fn coerce_knowledge(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Some(0);
    }
    if let Ok(n) = raw.parse::<i64>() {
        return Some(n);
    }
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && v.fract() == 0.0)
        .map(|v| v as i64)
}

/// Validate every row plus the collection rules.
///
/// Row failures land under `techs.<index>.title` / `techs.<index>.knowledge`,
/// collection failures under `techs`.
pub fn validate_techs(
    entries: &[TechEntry],
    rules: &TechRules,
) -> Result<Vec<ValidTech>, FieldErrors> {
    let mut errors = FieldErrors::new();
    let mut valid = Vec::with_capacity(entries.len());
    let mut levels = Vec::with_capacity(entries.len());

    for (idx, entry) in entries.iter().enumerate() {
        let title_ok = !entry.title.trim().is_empty();
        if !title_ok {
            errors.push(
                format!("techs.{idx}.title"),
                FieldError::Required { label: "Title" },
            );
        }

        let knowledge = match coerce_knowledge(&entry.knowledge) {
            None => {
                errors.push(
                    format!("techs.{idx}.knowledge"),
                    FieldError::Format("Knowledge must be a whole number".to_string()),
                );
                None
            }
            Some(level) if !(rules.knowledge_min..=rules.knowledge_max).contains(&level) => {
                errors.push(
                    format!("techs.{idx}.knowledge"),
                    FieldError::Range(format!(
                        "Knowledge must be between {} and {}",
                        rules.knowledge_min, rules.knowledge_max
                    )),
                );
                None
            }
            Some(level) => Some(level),
        };

        if let Some(level) = knowledge {
            levels.push(level);
            if title_ok {
                valid.push(ValidTech {
                    title: entry.title.clone(),
                    knowledge: level,
                });
            }
        }
    }

    if entries.len() < rules.min_entries {
        errors.push(
            "techs",
            FieldError::CollectionSize {
                min: rules.min_entries,
            },
        );
    }
    if !levels.iter().any(|level| *level > rules.expert_threshold) {
        errors.push(
            "techs",
            FieldError::CollectionPolicy {
                threshold: rules.expert_threshold,
            },
        );
    }

    errors.into_result(valid)
}
