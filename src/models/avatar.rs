// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Avatar file metadata and validation helpers (UI-agnostic).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::AvatarRules;
use crate::models::field_error::FieldError;

/// A file chosen in the picker, as seen by the validator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHandle {
    /// Original file name (no directories).
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// MIME type essence, e.g. `image/png`.
    pub mime: String,
    /// Where the bytes live on disk.
    pub path: PathBuf,
}

impl FileHandle {
    pub fn new(name: impl Into<String>, size: u64, mime: impl Into<String>, path: PathBuf) -> Self {
        Self {
            name: name.into(),
            size,
            mime: mime.into(),
            path,
        }
    }

    /// Inspect a file on disk: size from metadata, MIME guessed from the extension.
    ///
    /// # Errors
    ///
    /// Returns an error when the file metadata cannot be read or the path is not a file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let meta = path
            .metadata()
            .with_context(|| format!("Failed to read file metadata: {:?}", path))?;
        if !meta.is_file() {
            anyhow::bail!("Not a regular file: {:?}", path);
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "avatar".to_string());
        Ok(Self::new(name, meta.len(), guess_mime(path), path.to_path_buf()))
    }
}

/// Guess a MIME essence from the file extension.
pub fn guess_mime(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// Resolve the picker's file list to a single avatar and check it against `rules`.
///
/// Size and type are both checked so each violation is reported.
pub fn validate_avatar(
    files: &[FileHandle],
    rules: &AvatarRules,
) -> Result<FileHandle, Vec<FieldError>> {
    let Some(file) = files.first() else {
        return Err(vec![FieldError::Required { label: "Avatar" }]);
    };

    let mut errors = Vec::new();
    if file.size > rules.max_bytes {
        errors.push(FieldError::Range(format!(
            "Avatar must be at most {}",
            format_bytes(rules.max_bytes)
        )));
    }
    let accepted = rules
        .accepted_types
        .iter()
        .any(|t| t.eq_ignore_ascii_case(&file.mime));
    if !accepted {
        errors.push(FieldError::Format(format!(
            "Avatar type {} is not supported (accepted: {})",
            file.mime,
            rules.accepted_types.join(", ")
        )));
    }

    if errors.is_empty() {
        Ok(file.clone())
    } else {
        Err(errors)
    }
}

/// Human-readable formatting for byte sizes with binary units.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}
