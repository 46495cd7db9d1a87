// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Form rules and storage settings, loadable from a TOML file.
//!
//! Every field has a default so a partial (or absent) file is valid.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Default location probed when no config path is given explicitly.
pub const DEFAULT_CONFIG_PATH: &str = "techform.toml";

/// Top-level configuration for validation and submission.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Domain suffix every email must end with (compared case-insensitively).
    pub email_suffix: String,
    /// Minimum password length in characters.
    pub min_password_len: usize,
    pub avatar: AvatarRules,
    pub techs: TechRules,
    pub storage: StorageConfig,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            email_suffix: "@rocketseat.com.br".to_string(),
            min_password_len: 6,
            avatar: AvatarRules::default(),
            techs: TechRules::default(),
            storage: StorageConfig::default(),
        }
    }
}

/// Limits applied to the uploaded avatar.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AvatarRules {
    /// Largest accepted file size in bytes (inclusive).
    pub max_bytes: u64,
    /// Accepted MIME types, matched case-insensitively.
    pub accepted_types: Vec<String>,
}

impl Default for AvatarRules {
    fn default() -> Self {
        Self {
            max_bytes: 5 * 1024 * 1024,
            accepted_types: ["image/jpeg", "image/jpg", "image/png", "image/webp"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Rules for the technology list.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TechRules {
    pub min_entries: usize,
    pub knowledge_min: i64,
    pub knowledge_max: i64,
    /// At least one entry must be strictly above this level.
    pub expert_threshold: i64,
}

impl Default for TechRules {
    fn default() -> Self {
        Self {
            min_entries: 2,
            knowledge_min: 1,
            knowledge_max: 100,
            expert_threshold: 50,
        }
    }
}

/// Where uploaded avatars end up.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory acting as the storage bucket.
    pub bucket_dir: PathBuf,
    /// Prefix prepended to every object key.
    pub key_prefix: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bucket_dir: PathBuf::from("bucket"),
            key_prefix: "images/".to_string(),
        }
    }
}

/// Parse a configuration from TOML text.
pub fn parse_config(text: &str) -> Result<FormConfig> {
    toml::from_str(text).context("Failed to parse form configuration")
}

/// Load configuration from `path`.
///
/// A missing file at [`DEFAULT_CONFIG_PATH`] yields the defaults; any other
/// missing path is an error since the user asked for it explicitly.
pub fn load_config(path: &Path) -> Result<FormConfig> {
    if !path.exists() && path == Path::new(DEFAULT_CONFIG_PATH) {
        log::debug!("no config at {}, using defaults", path.display());
        return Ok(FormConfig::default());
    }
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse_config(&text)
}
