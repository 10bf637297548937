use crate::catalog::CatalogChanged;
use crate::error::{KeyphraseError, Result};
use crate::models::{PhraseEntry, PhraseValue};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Mutex;

/// Read access to the phrase catalog
pub trait PhraseStore: Send + Sync {
    /// Current value for `key`, or `None` if the key is not in the catalog
    fn get(&self, key: &str) -> Result<Option<PhraseValue>>;

    /// Every entry currently in the catalog
    fn all(&self) -> Result<Vec<PhraseEntry>>;
}

/// Catalog kept in a JSON array on disk. Every call reads the file again.
#[derive(Debug, Clone)]
pub struct JsonPhraseStore {
    path: PathBuf,
}

impl JsonPhraseStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Vec<PhraseEntry>> {
        if !self.path.exists() {
            return Err(KeyphraseError::DatabaseNotFound(
                self.path.to_string_lossy().to_string(),
            ));
        }

        let content = fs::read_to_string(&self.path)?;

        // Handle empty database file
        if content.trim().is_empty() {
            return Ok(vec![]);
        }

        serde_json::from_str(&content).map_err(|e| e.into())
    }
}

impl PhraseStore for JsonPhraseStore {
    fn get(&self, key: &str) -> Result<Option<PhraseValue>> {
        Ok(self
            .load()?
            .into_iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.value))
    }

    fn all(&self) -> Result<Vec<PhraseEntry>> {
        self.load()
    }
}

/// In-process catalog that notifies subscribers on every change
#[derive(Default)]
pub struct MemoryPhraseStore {
    entries: Mutex<Vec<PhraseEntry>>,
    subscribers: Mutex<Vec<Sender<CatalogChanged>>>,
}

impl MemoryPhraseStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<PhraseEntry>) -> Self {
        Self {
            entries: Mutex::new(entries),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Receive a [`CatalogChanged`] after every insert or remove
    pub fn subscribe(&self) -> Receiver<CatalogChanged> {
        let (tx, rx) = channel();
        self.subscribers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(tx);
        rx
    }

    /// Insert a new phrase or replace the value of an existing key
    pub fn insert(&self, key: &str, value: &str) {
        {
            let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
            match entries.iter_mut().find(|entry| entry.key == key) {
                Some(entry) => entry.update_value(value),
                None => entries.push(PhraseEntry::new(key, value)),
            }
        }
        self.broadcast();
    }

    pub fn remove(&self, key: &str) -> bool {
        let removed = {
            let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
            let before = entries.len();
            entries.retain(|entry| entry.key != key);
            entries.len() != before
        };
        if removed {
            self.broadcast();
        }
        removed
    }

    fn broadcast(&self) {
        let mut subscribers = self.subscribers.lock().unwrap_or_else(|e| e.into_inner());
        subscribers.retain(|tx| tx.send(CatalogChanged).is_ok());
    }
}

impl PhraseStore for MemoryPhraseStore {
    fn get(&self, key: &str) -> Result<Option<PhraseValue>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.value.clone()))
    }

    fn all(&self) -> Result<Vec<PhraseEntry>> {
        Ok(self
            .entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone())
    }
}
