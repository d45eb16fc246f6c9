//! Persisted key-value scope for local state.
//!
//! The cart mirror and the session live under well-known keys in a small
//! durable scope. The trait keeps the storage swappable: the CLI uses a
//! JSON file on disk, tests use an in-memory map.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use thiserror::Error;

/// Well-known keys within the persisted scope.
pub mod keys {
    /// The cart's item sequence, mirrored after every state change.
    pub const CART_ITEMS: &str = "cart_items";
    /// The bearer session token.
    pub const AUTH_TOKEN: &str = "auth_token";
    /// The signed-in user record.
    pub const USER: &str = "user";
}

/// Errors from the persisted scope.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying file I/O failed.
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The persisted document could not be encoded or decoded.
    #[error("store serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// The scope's lock was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    Poisoned,
}

/// A durable key-value scope with string values.
///
/// Values are opaque strings; callers serialize structured state (the
/// cart mirror is a JSON array) before storing it.
pub trait KeyValueScope: Send + Sync {
    /// Read a value, `None` if the key is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove a key. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be written.
    fn delete(&self, key: &str) -> Result<(), StoreError>;
}

// =============================================================================
// MemoryScope
// =============================================================================

/// In-memory scope for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryScope {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryScope {
    /// Create an empty scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty scope behind an `Arc`, ready to share between the
    /// session and the cart service.
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

impl KeyValueScope for MemoryScope {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

// =============================================================================
// FileScope
// =============================================================================

/// File-backed scope storing all keys in a single JSON document.
///
/// The document is rewritten in full on every mutation. Three small keys
/// live here, so the simplicity wins over a file per key.
#[derive(Debug)]
pub struct FileScope {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileScope {
    /// Open (or create) the scope at `dir/state.json`. A document that
    /// cannot be parsed is discarded with a warning; losing local state
    /// must not take the storefront down.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or an existing
    /// document cannot be read.
    pub fn open(dir: &std::path::Path) -> Result<Self, StoreError> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join("state.json");

        let entries = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            match serde_json::from_str(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(
                        "persisted state at {} is unreadable, starting empty: {e}",
                        path.display()
                    );
                    HashMap::new()
                }
            }
        } else {
            HashMap::new()
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    fn flush(&self, entries: &HashMap<String, String>) -> Result<(), StoreError> {
        let raw = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl KeyValueScope for FileScope {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries)
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.remove(key);
        self.flush(&entries)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_scope_roundtrip() {
        let scope = MemoryScope::new();
        assert!(scope.get("k").unwrap().is_none());

        scope.set("k", "v").unwrap();
        assert_eq!(scope.get("k").unwrap().as_deref(), Some("v"));

        scope.set("k", "v2").unwrap();
        assert_eq!(scope.get("k").unwrap().as_deref(), Some("v2"));

        scope.delete("k").unwrap();
        assert!(scope.get("k").unwrap().is_none());
    }

    #[test]
    fn test_memory_scope_delete_absent_key_is_ok() {
        let scope = MemoryScope::new();
        assert!(scope.delete("never-set").is_ok());
    }

    #[test]
    fn test_file_scope_persists_across_instances() {
        let dir = std::env::temp_dir().join(format!(
            "seamline-store-test-{}-{:?}",
            std::process::id(),
            std::thread::current().id()
        ));

        {
            let scope = FileScope::open(&dir).unwrap();
            scope.set(keys::CART_ITEMS, "[]").unwrap();
            scope.set(keys::AUTH_TOKEN, "tok").unwrap();
        }

        {
            let scope = FileScope::open(&dir).unwrap();
            assert_eq!(scope.get(keys::CART_ITEMS).unwrap().as_deref(), Some("[]"));
            scope.delete(keys::AUTH_TOKEN).unwrap();
        }

        let scope = FileScope::open(&dir).unwrap();
        assert!(scope.get(keys::AUTH_TOKEN).unwrap().is_none());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_file_scope_discards_corrupt_document() {
        let dir = std::env::temp_dir().join(format!(
            "seamline-store-corrupt-{}-{:?}",
            std::process::id(),
            std::thread::current().id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("state.json"), "{not json").unwrap();

        let scope = FileScope::open(&dir).unwrap();
        assert!(scope.get(keys::CART_ITEMS).unwrap().is_none());

        // Writes work again and replace the broken document.
        scope.set(keys::AUTH_TOKEN, "tok").unwrap();
        let reopened = FileScope::open(&dir).unwrap();
        assert_eq!(reopened.get(keys::AUTH_TOKEN).unwrap().as_deref(), Some("tok"));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
