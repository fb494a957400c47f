//! Snapshot file for a persistent cache.
//!
//! One JSON document per cache instance holding every fresh entry with its
//! fetch timestamp. Writes go to a temp file first and are renamed into
//! place, so a crash mid-save leaves the previous snapshot intact.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CacheError;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot<K, V> {
    version: u32,
    entries: Vec<SnapshotEntry<K, V>>,
}

/// One persisted cache entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEntry<K, V> {
    pub key: K,
    pub value: V,
    pub fetched_at: DateTime<Utc>,
}

/// Location of a cache snapshot on disk.
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every entry from disk. A missing file is an empty snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Load`] if the file cannot be read, does not
    /// parse, or carries an unknown version.
    pub fn load<K, V>(&self) -> Result<Vec<SnapshotEntry<K, V>>, CacheError>
    where
        K: DeserializeOwned,
        V: DeserializeOwned,
    {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No cache snapshot yet");
                return Ok(Vec::new());
            }
            Err(e) => return Err(self.load_error(e)),
        };

        let snapshot: Snapshot<K, V> =
            serde_json::from_slice(&bytes).map_err(|e| self.load_error(e))?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(self.load_error(format!(
                "unsupported snapshot version {}",
                snapshot.version
            )));
        }
        Ok(snapshot.entries)
    }

    /// Serialize entries into snapshot bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Save`] if a key or value fails to serialize.
    pub fn encode<K, V>(&self, entries: Vec<SnapshotEntry<K, V>>) -> Result<Vec<u8>, CacheError>
    where
        K: Serialize,
        V: Serialize,
    {
        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            entries,
        };
        serde_json::to_vec(&snapshot).map_err(|e| self.save_error(e))
    }

    /// Write snapshot bytes atomically, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Save`] on any I/O failure.
    pub fn write(&self, bytes: &[u8]) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.save_error(e))?;
            }
        }

        let mut temp_name = self.path.as_os_str().to_owned();
        temp_name.push(".tmp");
        let temp_path = PathBuf::from(temp_name);

        let cleanup_and_err = |e: std::io::Error| {
            let _ = fs::remove_file(&temp_path);
            self.save_error(e)
        };

        let mut file = fs::File::create(&temp_path).map_err(|e| self.save_error(e))?;
        file.write_all(bytes).map_err(cleanup_and_err)?;
        file.sync_all().map_err(cleanup_and_err)?;
        fs::rename(&temp_path, &self.path).map_err(cleanup_and_err)?;
        Ok(())
    }

    fn load_error(&self, reason: impl ToString) -> CacheError {
        CacheError::Load {
            path: self.path.clone(),
            reason: reason.to_string(),
        }
    }

    fn save_error(&self, reason: impl ToString) -> CacheError {
        CacheError::Save {
            path: self.path.clone(),
            reason: reason.to_string(),
        }
    }
}
