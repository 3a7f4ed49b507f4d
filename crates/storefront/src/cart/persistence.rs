//! Cart persistence backends.
//!
//! The cart survives process restarts through a [`CartRepository`]. The
//! file-backed implementation keeps one JSON document per owner under a
//! storage directory; writes go to a sibling temp file first and are renamed
//! into place so a crash mid-write never leaves a truncated cart behind.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use thiserror::Error;

use super::{CartLine, CartOwner};

/// Errors that can occur reading or writing persisted cart state.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing store failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The cart could not be serialized.
    #[error("cart serialization failed: {0}")]
    Serialize(serde_json::Error),

    /// The stored cart exists but cannot be decoded.
    #[error("stored cart is corrupt: {0}")]
    DataCorruption(String),
}

/// Durable storage for per-owner carts.
///
/// Implementations must persist the full line list on `save` so a
/// subsequent `load` (possibly in a new process) observes everything
/// written before it. No cross-process merging is performed; concurrent
/// writers get last-write-wins.
pub trait CartRepository {
    /// Load the persisted lines for `owner`, empty if none were saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or holds corrupt data.
    fn load(&self, owner: &CartOwner) -> Result<Vec<CartLine>, StorageError>;

    /// Replace the persisted lines for `owner`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn save(&self, owner: &CartOwner, lines: &[CartLine]) -> Result<(), StorageError>;

    /// Remove the persisted entry for `owner`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn delete(&self, owner: &CartOwner) -> Result<(), StorageError>;
}

/// File-backed cart storage: one JSON document per owner.
#[derive(Debug, Clone)]
pub struct JsonFileCartRepository {
    dir: PathBuf,
}

impl JsonFileCartRepository {
    /// Create a repository rooted at `dir`. The directory is created on
    /// first write, not here.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, owner: &CartOwner) -> PathBuf {
        self.dir.join(format!("{}.json", owner.storage_key()))
    }
}

impl CartRepository for JsonFileCartRepository {
    fn load(&self, owner: &CartOwner) -> Result<Vec<CartLine>, StorageError> {
        let path = self.path_for(owner);

        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StorageError::Io(e)),
        };

        serde_json::from_str(&contents).map_err(|e| {
            StorageError::DataCorruption(format!("{}: {e}", path.display()))
        })
    }

    fn save(&self, owner: &CartOwner, lines: &[CartLine]) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;

        let json = serde_json::to_string(lines).map_err(StorageError::Serialize)?;

        // Write-then-rename keeps the previous cart intact if we crash
        // mid-write.
        let path = self.path_for(owner);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &path)?;

        Ok(())
    }

    fn delete(&self, owner: &CartOwner) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(owner)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e)),
        }
    }
}

/// In-memory cart storage for tests and ephemeral sessions.
///
/// Clones share the same underlying map, so a store opened from a clone
/// observes earlier saves - mirroring how separate opens of the file
/// repository see the same directory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCartRepository {
    carts: Arc<Mutex<HashMap<String, Vec<CartLine>>>>,
}

impl CartRepository for InMemoryCartRepository {
    fn load(&self, owner: &CartOwner) -> Result<Vec<CartLine>, StorageError> {
        let carts = self
            .carts
            .lock()
            .map_err(|_| StorageError::DataCorruption("lock poisoned".to_string()))?;
        Ok(carts.get(&owner.storage_key()).cloned().unwrap_or_default())
    }

    fn save(&self, owner: &CartOwner, lines: &[CartLine]) -> Result<(), StorageError> {
        let mut carts = self
            .carts
            .lock()
            .map_err(|_| StorageError::DataCorruption("lock poisoned".to_string()))?;
        carts.insert(owner.storage_key(), lines.to_vec());
        Ok(())
    }

    fn delete(&self, owner: &CartOwner) -> Result<(), StorageError> {
        let mut carts = self
            .carts
            .lock()
            .map_err(|_| StorageError::DataCorruption("lock poisoned".to_string()))?;
        carts.remove(&owner.storage_key());
        Ok(())
    }
}
