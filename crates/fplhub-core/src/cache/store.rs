use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use anyhow::{Context, Result};
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::debug;

use super::value::CachedValue;

/// Freshness metadata file name inside the cache directory.
/// Entry files are named by hex digest, so this can never collide with one.
const METADATA_FILE: &str = "metadata.json";

/// Extension for every file the store writes.
const ENTRY_EXTENSION: &str = "json";

/// Disk-backed key/value store with a per-key upstream freshness marker.
///
/// Each key lives in its own file named by the SHA-256 of the key. The
/// freshness index is a single flat `{key: timestamp}` JSON file, loaded once
/// and rewritten in full whenever a write carries a timestamp.
#[derive(Debug)]
pub struct LocalStore {
    cache_dir: PathBuf,
    metadata: BTreeMap<String, String>,
}

impl LocalStore {
    /// Open (creating if needed) a store rooted at `cache_dir`.
    pub fn open(cache_dir: impl Into<PathBuf>) -> Result<Self> {
        let cache_dir = cache_dir.into();
        std::fs::create_dir_all(&cache_dir)
            .with_context(|| format!("Failed to create cache directory: {}", cache_dir.display()))?;

        let metadata = Self::load_metadata(&cache_dir.join(METADATA_FILE))?;
        debug!(?cache_dir, tracked = metadata.len(), "Opened local store");

        Ok(Self { cache_dir, metadata })
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn load_metadata(path: &Path) -> Result<BTreeMap<String, String>> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e).context("Failed to read cache metadata"),
        };
        serde_json::from_str(&contents).context("Failed to parse cache metadata")
    }

    fn save_metadata(&self) -> Result<()> {
        let contents = serde_json::to_string_pretty(&self.metadata)?;
        std::fs::write(self.metadata_path(), contents).context("Failed to write cache metadata")?;
        Ok(())
    }

    fn metadata_path(&self) -> PathBuf {
        self.cache_dir.join(METADATA_FILE)
    }

    /// Path of the entry file for `key`. Same key, same path.
    pub fn entry_path(&self, key: &str) -> PathBuf {
        self.cache_dir
            .join(format!("{}.{}", entry_file_stem(key), ENTRY_EXTENSION))
    }

    /// Load the value stored under `key`.
    ///
    /// A key that was never written is `Ok(None)`. A file that exists but
    /// does not decode is an error: that is storage damage, not a miss.
    pub fn get(&self, key: &str) -> Result<Option<CachedValue>> {
        let path = self.entry_path(key);
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read cache entry: {}", key))
            }
        };

        let json: Value = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse cache entry: {}", key))?;
        let value = CachedValue::from_json(json)
            .with_context(|| format!("Malformed cache entry: {}", key))?;

        Ok(Some(value))
    }

    /// Overwrite the entry for `key`. When `upstream_timestamp` is given it
    /// is recorded and the metadata file is rewritten.
    pub fn set(
        &mut self,
        key: &str,
        value: &CachedValue,
        upstream_timestamp: Option<&str>,
    ) -> Result<()> {
        let encoded = value
            .to_json()
            .with_context(|| format!("Cannot store value for key: {}", key))?;
        let contents = serde_json::to_string_pretty(&encoded)?;
        std::fs::write(self.entry_path(key), contents)
            .with_context(|| format!("Failed to write cache entry: {}", key))?;

        if let Some(timestamp) = upstream_timestamp.filter(|ts| !ts.is_empty()) {
            let previous = self.metadata.insert(key.to_string(), timestamp.to_string());
            if let Err(e) = self.save_metadata() {
                // Keep memory in line with what is on disk
                match previous {
                    Some(previous) => self.metadata.insert(key.to_string(), previous),
                    None => self.metadata.remove(key),
                };
                return Err(e);
            }
        }

        debug!(key, upstream_timestamp = ?upstream_timestamp, "Stored cache entry");
        Ok(())
    }

    /// Upstream timestamp recorded for `key`, if any.
    pub fn get_upstream_timestamp(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    /// All keys with a recorded timestamp, in key order.
    pub fn tracked(&self) -> impl Iterator<Item = (&str, &str)> {
        self.metadata.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Time since the entry for `key` was last written.
    ///
    /// `Ok(None)` when there is no entry. A modification time in the future
    /// (clock skew) counts as zero age.
    pub fn entry_age(&self, key: &str) -> Result<Option<Duration>> {
        let modified = match std::fs::metadata(self.entry_path(key)) {
            Ok(meta) => meta
                .modified()
                .with_context(|| format!("No modification time for cache entry: {}", key))?,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to stat cache entry: {}", key))
            }
        };

        Ok(Some(
            SystemTime::now()
                .duration_since(modified)
                .unwrap_or(Duration::ZERO),
        ))
    }

    /// Remove every entry and the freshness index. Other files in the
    /// directory are left alone.
    pub fn clear(&mut self) -> Result<usize> {
        let mut removed = 0;
        for entry in std::fs::read_dir(&self.cache_dir)
            .with_context(|| format!("Failed to list cache directory: {}", self.cache_dir.display()))?
        {
            let path = entry?.path();
            if path.is_file() && is_store_file(&path) {
                std::fs::remove_file(&path)
                    .with_context(|| format!("Failed to remove {}", path.display()))?;
                removed += 1;
            }
        }
        self.metadata.clear();
        debug!(removed, "Cleared local store");
        Ok(removed)
    }
}

/// Filesystem-safe name for a key.
fn entry_file_stem(key: &str) -> String {
    hex::encode(Sha256::digest(key.as_bytes()))
}

/// Whether `path` is the metadata file or an entry file the store names.
fn is_store_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if name == METADATA_FILE {
        return true;
    }
    let is_entry_stem = |stem: &str| {
        stem.len() == 64 && stem.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    };
    path.extension().is_some_and(|ext| ext == ENTRY_EXTENSION)
        && path.file_stem().and_then(|s| s.to_str()).is_some_and(is_entry_stem)
}

// ============================================================================
// Tests
// ============================================================================
