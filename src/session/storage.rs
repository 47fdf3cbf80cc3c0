//! Persistent client storage backends for the session record.
//!
//! DESIGN
//! ======
//! The session is persisted as two string-keyed entries, `admin_token` and
//! `admin_authenticated`. Backends read and write both entries as one unit so
//! a crash between writes can never leave a flag without its token.
//!
//! `FileStorage` keeps the entries in a small JSON document written via
//! temp-file-then-rename with owner-only permissions on unix.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Storage key for the bearer token.
pub const TOKEN_KEY: &str = "admin_token";
/// Storage key for the authenticated flag.
pub const AUTHENTICATED_KEY: &str = "admin_authenticated";

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by a storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("session storage I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing file exists but does not hold a valid entry set.
    #[error("session storage at {path} is corrupt: {message}")]
    Corrupt { path: PathBuf, message: String },
}

// =============================================================================
// ENTRIES
// =============================================================================

/// The raw persisted entries, exactly as they sit in storage.
///
/// Values are strings; interpretation (empty token, flag other than `"true"`)
/// belongs to the session store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEntries {
    #[serde(rename = "admin_token", default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(rename = "admin_authenticated", default, skip_serializing_if = "Option::is_none")]
    pub authenticated: Option<String>,
}

impl StoredEntries {
    /// Entries for a freshly created session.
    #[must_use]
    pub fn authenticated(token: &str) -> Self {
        Self { token: Some(token.to_owned()), authenticated: Some("true".to_owned()) }
    }
}

// =============================================================================
// STORAGE TRAIT
// =============================================================================

/// A persistent home for the session entries. Enables in-memory tests.
pub trait SessionStorage: Send {
    /// Read the persisted entries. Missing storage reads as empty entries.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be read or decoded.
    fn load(&self) -> Result<StoredEntries, StorageError>;

    /// Replace both entries in one write.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the write fails; the previous entries
    /// remain in place.
    fn store(&mut self, entries: &StoredEntries) -> Result<(), StorageError>;

    /// Remove both entries.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the removal fails.
    fn remove(&mut self) -> Result<(), StorageError>;
}

// =============================================================================
// MEMORY STORAGE
// =============================================================================

/// Process-local storage. Nothing survives a restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: StoredEntries,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-seeded with entries, as if left behind by an earlier run.
    #[must_use]
    pub fn with_entries(entries: StoredEntries) -> Self {
        Self { entries }
    }
}

impl SessionStorage for MemoryStorage {
    fn load(&self) -> Result<StoredEntries, StorageError> {
        Ok(self.entries.clone())
    }

    fn store(&mut self, entries: &StoredEntries) -> Result<(), StorageError> {
        self.entries = entries.clone();
        Ok(())
    }

    fn remove(&mut self) -> Result<(), StorageError> {
        self.entries = StoredEntries::default();
        Ok(())
    }
}

// =============================================================================
// FILE STORAGE
// =============================================================================

/// JSON-file storage that survives process restarts.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io { path: self.path.clone(), source }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SessionStorage for FileStorage {
    fn load(&self) -> Result<StoredEntries, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(StoredEntries::default()),
            Err(e) => return Err(self.io_error(e)),
        };
        if raw.trim().is_empty() {
            return Ok(StoredEntries::default());
        }
        serde_json::from_str(&raw)
            .map_err(|e| StorageError::Corrupt { path: self.path.clone(), message: e.to_string() })
    }

    fn store(&mut self, entries: &StoredEntries) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        let contents = serde_json::to_string_pretty(entries)
            .map_err(|e| StorageError::Corrupt { path: self.path.clone(), message: e.to_string() })?;

        let tmp = self.temp_path();
        write_private(&tmp, contents.as_bytes()).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))
    }

    fn remove(&mut self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

fn write_private(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

#[cfg(test)]
#[path = "storage_test.rs"]
mod tests;
