//! Persisted key-value storage for the session inputs and theme.
//!
//! The controller only ever reads the three [`StorageKey`]s once at startup
//! and writes them back on every change. Everything else about the storage
//! mechanism stays behind [`KeyValueStore`].

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, PoisonError};

use crate::error::CopilotError;

mod file;

pub use file::{FileStore, default_state_file, resolve_state_file};

/// Keys persisted between sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StorageKey {
    /// Last repository URL typed by the user.
    RepoUrl,
    /// Last raw pull request number typed by the user.
    PrNumber,
    /// Selected theme, `"dark"` or `"light"`.
    Theme,
}

impl StorageKey {
    /// Every persisted key.
    pub const ALL: [Self; 3] = [Self::RepoUrl, Self::PrNumber, Self::Theme];

    /// Key name used by the backing store.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RepoUrl => "repoUrl",
            Self::PrNumber => "prNumber",
            Self::Theme => "theme",
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// String key-value store.
pub trait KeyValueStore: Send + Sync {
    /// Reads a value, returning `None` when the key was never written.
    fn get(&self, key: StorageKey) -> Option<String>;

    /// Writes a value.
    ///
    /// # Errors
    ///
    /// Returns [`CopilotError::Storage`] when the value cannot be persisted.
    fn set(&self, key: StorageKey, value: &str) -> Result<(), CopilotError>;
}

/// Store kept in process memory only.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<StorageKey, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with entries.
    #[must_use]
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (StorageKey, &'a str)>) -> Self {
        let map = entries
            .into_iter()
            .map(|(key, value)| (key, value.to_owned()))
            .collect();
        Self {
            entries: Mutex::new(map),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: StorageKey) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned()
    }

    fn set(&self, key: StorageKey, value: &str) -> Result<(), CopilotError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, value.to_owned());
        Ok(())
    }
}
