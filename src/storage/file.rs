//! JSON file backed key-value store.

use std::collections::BTreeMap;
use std::io;
use std::sync::{Mutex, PoisonError};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;

use crate::error::CopilotError;

use super::{KeyValueStore, StorageKey};

/// Store persisting all keys as one JSON object file.
///
/// The whole map is rewritten on every `set`, so the file always reflects
/// the latest value of every key.
#[derive(Debug)]
pub struct FileStore {
    path: Utf8PathBuf,
    dir: Dir,
    file_name: String,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Opens the store at `path`, creating parent directories as needed.
    ///
    /// A missing file is treated as an empty store.
    ///
    /// # Errors
    ///
    /// Returns [`CopilotError::Storage`] when the directory cannot be created
    /// or an existing file cannot be read or parsed.
    pub fn open(path: &Utf8Path) -> Result<Self, CopilotError> {
        let file_name = path.file_name().ok_or_else(|| CopilotError::Storage {
            message: format!("invalid state file path '{path}': no file name"),
        })?;
        let parent = match path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent,
            _ => Utf8Path::new("."),
        };

        Dir::create_ambient_dir_all(parent, ambient_authority()).map_err(|error| {
            CopilotError::Storage {
                message: format!("failed to create state directory '{parent}': {error}"),
            }
        })?;
        let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|error| {
            CopilotError::Storage {
                message: format!("failed to open state directory '{parent}': {error}"),
            }
        })?;

        let entries = match dir.read_to_string(file_name) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content).map_err(|error| CopilotError::Storage {
                message: format!("failed to parse state file '{path}': {error}"),
            })?,
            Err(error) if error.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(error) => {
                return Err(CopilotError::Storage {
                    message: format!("failed to read state file '{path}': {error}"),
                });
            }
        };

        Ok(Self {
            path: path.to_path_buf(),
            file_name: file_name.to_owned(),
            dir,
            entries: Mutex::new(entries),
        })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        self.path.as_path()
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: StorageKey) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key.as_str())
            .cloned()
    }

    fn set(&self, key: StorageKey, value: &str) -> Result<(), CopilotError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.as_str().to_owned(), value.to_owned());

        let json = serde_json::to_string_pretty(&*entries).map_err(|error| {
            CopilotError::Storage {
                message: format!("failed to serialise state for '{}': {error}", self.path),
            }
        })?;

        self.dir
            .write(self.file_name.as_str(), json)
            .map_err(|error| CopilotError::Storage {
                message: format!("failed to write state file '{}': {error}", self.path),
            })
    }
}

/// Resolves the default state file location.
///
/// Defaults to `${XDG_STATE_HOME}/pr-copilot/session.json` when
/// `XDG_STATE_HOME` is set, else to
/// `${HOME}/.local/state/pr-copilot/session.json`.
///
/// # Errors
///
/// Returns [`CopilotError::Configuration`] when neither `XDG_STATE_HOME` nor
/// `HOME` is available.
pub fn default_state_file() -> Result<Utf8PathBuf, CopilotError> {
    let xdg = std::env::var("XDG_STATE_HOME")
        .ok()
        .filter(|v| !v.is_empty());
    let home = std::env::var("HOME").ok().filter(|v| !v.is_empty());

    resolve_state_file(xdg.as_deref(), home.as_deref())
}

/// Resolves the state file from optional environment values.
///
/// # Errors
///
/// Returns [`CopilotError::Configuration`] when both values are absent.
pub fn resolve_state_file(
    xdg_state_home: Option<&str>,
    home: Option<&str>,
) -> Result<Utf8PathBuf, CopilotError> {
    if let Some(state_home) = xdg_state_home {
        return Ok(Utf8PathBuf::from(state_home)
            .join("pr-copilot")
            .join("session.json"));
    }

    if let Some(home_dir) = home {
        return Ok(Utf8PathBuf::from(home_dir)
            .join(".local")
            .join("state")
            .join("pr-copilot")
            .join("session.json"));
    }

    Err(CopilotError::Configuration {
        message: "cannot locate a state directory: set XDG_STATE_HOME or HOME".to_owned(),
    })
}
