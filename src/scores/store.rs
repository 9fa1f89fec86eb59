//! Minimal key-value persistence for the score table.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ScoreResult;

/// String-keyed, string-valued store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> ScoreResult<Option<String>>;
    fn set(&mut self, key: &str, value: String) -> ScoreResult<()>;
    /// Every key currently stored, sorted.
    fn list(&self) -> ScoreResult<Vec<String>>;
}

/// In-memory store; nothing survives the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> ScoreResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> ScoreResult<()> {
        self.entries.insert(key.to_owned(), value);
        Ok(())
    }

    fn list(&self) -> ScoreResult<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }
}

/// Store backed by one JSON object on disk.
///
/// The file is read once on open and rewritten on every `set`, through a
/// sibling temp file and a rename so a crash never leaves half a file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open `path`, treating a missing file as an empty store.
    pub fn open(path: impl Into<PathBuf>) -> ScoreResult<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => BTreeMap::new(),
            Ok(text) => serde_json::from_str(&text)?,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "score file not found, starting empty");
                BTreeMap::new()
            }
            Err(err) => return Err(err.into()),
        };
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> ScoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let text = serde_json::to_string_pretty(&self.entries)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, text)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> ScoreResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> ScoreResult<()> {
        self.entries.insert(key.to_owned(), value);
        self.flush()
    }

    fn list(&self) -> ScoreResult<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }
}
