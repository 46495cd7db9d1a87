// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Field-scoped validation failures.

use std::collections::BTreeMap;

use thiserror::Error;

/// A single user-correctable problem with one field.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    /// A required value is missing or blank.
    #[error("{label} is required")]
    Required { label: &'static str },
    /// The value has the wrong shape (email syntax, email domain, file type, not a number).
    #[error("{0}")]
    Format(String),
    /// The value is outside an allowed range (file size, knowledge level, password length).
    #[error("{0}")]
    Range(String),
    /// Too few entries in a collection.
    #[error("Add at least {min} technologies")]
    CollectionSize { min: usize },
    /// No entry in the collection satisfies the required level.
    #[error("You are still learning! At least one technology needs a knowledge level above {threshold}")]
    CollectionPolicy { threshold: i64 },
}

/// Violations keyed by field path (`name`, `techs.0.title`, ...).
///
/// Paths keep every violation in rule order; the first one is what a form shows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors {
    by_path: BTreeMap<String, Vec<FieldError>>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, path: impl Into<String>, error: FieldError) {
        self.by_path.entry(path.into()).or_default().push(error);
    }

    /// Record `error` ahead of any existing violations for `path`, making it the displayed one.
    pub fn push_front(&mut self, path: impl Into<String>, error: FieldError) {
        self.by_path.entry(path.into()).or_default().insert(0, error);
    }

    /// Merge all violations from `other` into `self`.
    pub fn extend(&mut self, other: FieldErrors) {
        for (path, errors) in other.by_path {
            self.by_path.entry(path).or_default().extend(errors);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }

    /// Number of fields with at least one violation.
    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    pub fn get(&self, path: &str) -> &[FieldError] {
        self.by_path.get(path).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Displayed message for a field, if it failed.
    pub fn message(&self, path: &str) -> Option<String> {
        self.get(path).first().map(ToString::to_string)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.by_path.contains_key(path)
    }

    /// First message per field, in path order.
    pub fn messages(&self) -> impl Iterator<Item = (&str, String)> {
        self.by_path
            .iter()
            .filter_map(|(path, errs)| errs.first().map(|e| (path.as_str(), e.to_string())))
    }

    /// Turn an accumulated error set into a result.
    pub fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}
