// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Storage collaborator: put a picked file into a bucket under a key.
//!
//! [`DirectoryStore`] treats a local directory as the bucket; [`MemoryStore`]
//! keeps objects in memory and can be told to fail.

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow, bail};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::models::avatar::FileHandle;
use crate::utils::sanitize_component;

/// Receipt for a stored object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StoredBlob {
    pub key: String,
    pub size: u64,
    pub sha256: String,
}

/// Anything that can store a file's bytes under a key.
pub trait BlobStore: Send + Sync {
    /// Store `blob` under `key`, overwriting any previous object.
    fn store(&self, key: &str, blob: &FileHandle) -> Result<StoredBlob>;
}

/// Lowercase hex SHA-256 of an object's bytes.
fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Build the object key for an uploaded file: `prefix` + sanitized file name.
pub fn object_key(prefix: &str, file_name: &str) -> String {
    format!("{prefix}{}", sanitize_component(file_name))
}

/// A bucket backed by a directory on disk.
#[derive(Clone, Debug)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a key below the bucket root, refusing anything that could escape it.
    fn resolve(&self, key: &str) -> Result<PathBuf> {
        let rel = Path::new(key);
        if key.is_empty()
            || !rel
                .components()
                .all(|c| matches!(c, Component::Normal(_)))
        {
            bail!("Invalid object key: {key:?}");
        }
        Ok(self.root.join(rel))
    }
}

impl BlobStore for DirectoryStore {
    fn store(&self, key: &str, blob: &FileHandle) -> Result<StoredBlob> {
        let target = self.resolve(key)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create bucket directory: {:?}", parent))?;
        }
        let size = fs::copy(&blob.path, &target).with_context(|| {
            format!("Failed to store {:?} as {}", blob.path, target.display())
        })?;
        let stored = fs::read(&target)
            .with_context(|| format!("Failed to read back {}", target.display()))?;
        let sha256 = sha256_hex(&stored);
        log::info!("stored {} ({} bytes) in {}", key, size, self.root.display());
        Ok(StoredBlob {
            key: key.to_string(),
            size,
            sha256,
        })
    }
}

/// In-memory bucket.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: Mutex<Vec<(String, Vec<u8>)>>,
    fail_with: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every `store` call is rejected with `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            objects: Mutex::default(),
            fail_with: Some(reason.into()),
        }
    }

    /// Keys stored so far, in call order.
    pub fn keys(&self) -> Vec<String> {
        self.objects
            .lock()
            .map(|objs| objs.iter().map(|(k, _)| k.clone()).collect())
            .unwrap_or_default()
    }

    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        let objs = self.objects.lock().ok()?;
        objs.iter().rev().find(|(k, _)| k == key).map(|(_, v)| v.clone())
    }
}

impl BlobStore for MemoryStore {
    fn store(&self, key: &str, blob: &FileHandle) -> Result<StoredBlob> {
        if let Some(reason) = &self.fail_with {
            bail!("Storage rejected {key}: {reason}");
        }
        let bytes = fs::read(&blob.path)
            .with_context(|| format!("Failed to read file for upload: {:?}", blob.path))?;
        let receipt = StoredBlob {
            key: key.to_string(),
            size: bytes.len() as u64,
            sha256: sha256_hex(&bytes),
        };
        self.objects
            .lock()
            .map_err(|_| anyhow!("Memory store lock poisoned"))?
            .push((key.to_string(), bytes));
        Ok(receipt)
    }
}
