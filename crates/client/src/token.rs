//! Persisted session token storage.
//!
//! The original client kept the token in a browser-visible cookie with its
//! expiry. The file store is the same idea for a native client: a small
//! world-readable JSON file whose absence means "not signed in".

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};

/// A persisted token and its expiry (epoch milliseconds, as issued by the
/// sign-in endpoint).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedToken {
    /// The raw bearer token.
    pub token: String,
    /// Expiry as epoch milliseconds.
    pub expired: i64,
}

impl PersistedToken {
    /// True when the token has expired at `now_ms` (epoch milliseconds).
    #[must_use]
    pub const fn is_expired(&self, now_ms: i64) -> bool {
        self.expired <= now_ms
    }
}

/// Where the session token lives between runs.
pub trait TokenStore {
    /// Read the persisted token, if any. Unreadable or corrupt state counts
    /// as absent.
    fn load(&self) -> Option<PersistedToken>;

    /// Persist a token.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the token could not be written.
    fn save(&self, token: &PersistedToken) -> io::Result<()>;

    /// Discard any persisted token. Clearing an empty store is not an error.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when an existing token could not be removed.
    fn clear(&self) -> io::Result<()>;
}

/// Token store backed by a JSON file.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Create a store at the given path. The file is created on first save.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The path this store reads and writes.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<PersistedToken> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "token file unreadable");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(token) => Some(token),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "token file corrupt");
                None
            }
        }
    }

    fn save(&self, token: &PersistedToken) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string(token).map_err(io::Error::other)?;
        std::fs::write(&self.path, raw)
    }

    fn clear(&self) -> io::Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

/// In-memory token store for ephemeral sessions and tests.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slot: RwLock<Option<PersistedToken>>,
}

impl MemoryTokenStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<PersistedToken> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn save(&self, token: &PersistedToken) -> io::Result<()> {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_check() {
        let token = PersistedToken {
            token: "abc".to_owned(),
            expired: 1_000,
        };
        assert!(!token.is_expired(999));
        assert!(token.is_expired(1_000));
        assert!(token.is_expired(2_000));
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested").join("token.json"));

        assert!(store.load().is_none());

        let token = PersistedToken {
            token: "abc123".to_owned(),
            expired: 1_700_000_000_000,
        };
        store.save(&token).unwrap();
        assert_eq!(store.load(), Some(token));

        store.clear().unwrap();
        assert!(store.load().is_none());
        // Clearing again is fine.
        store.clear().unwrap();
    }

    #[test]
    fn test_file_store_corrupt_file_counts_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        std::fs::write(&path, "not json").unwrap();
        let store = FileTokenStore::new(&path);
        assert!(store.load().is_none());
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryTokenStore::new();
        assert!(store.load().is_none());
        let token = PersistedToken {
            token: "t".to_owned(),
            expired: 1,
        };
        store.save(&token).unwrap();
        assert_eq!(store.load(), Some(token));
        store.clear().unwrap();
        assert!(store.load().is_none());
    }
}
