//! Store persisted as one JSON document in a data directory.
//!
//! Every operation re-reads the document, so separate processes sharing the
//! directory see each other's writes. Writes from different processes are
//! not coordinated: the last one wins.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{KeyValueStore, StorageError};

const DOCUMENT_FILE: &str = "storage.json";
const TEMP_FILE: &str = "storage.json.tmp";

type Document = BTreeMap<String, String>;

/// Durable store rooted at a directory.
#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open (creating if needed) a store in `dir`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        tracing::debug!(path = %dir.display(), "Opened file store");
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    /// Path of the backing JSON document.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.dir.join(DOCUMENT_FILE)
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read_document(&self) -> Result<Document, StorageError> {
        match fs::read_to_string(self.path()) {
            Ok(content) if content.trim().is_empty() => Ok(Document::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Document::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Like `read_document`, but a corrupt document is discarded so the next
    /// write replaces it.
    fn read_document_for_update(&self) -> Result<Document, StorageError> {
        match self.read_document() {
            Err(StorageError::Corrupt(e)) => {
                tracing::warn!(
                    path = %self.path().display(),
                    error = %e,
                    "Discarding corrupt storage document"
                );
                Ok(Document::new())
            }
            other => other,
        }
    }

    fn write_document(&self, document: &Document) -> Result<(), StorageError> {
        let temp = self.dir.join(TEMP_FILE);
        fs::write(&temp, serde_json::to_vec_pretty(document)?)?;
        fs::rename(&temp, self.path())?;
        Ok(())
    }

    fn update(&self, apply: impl FnOnce(&mut Document)) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().map_err(|_| StorageError::Poisoned)?;
        let mut document = self.read_document_for_update()?;
        apply(&mut document);
        self.write_document(&document)
    }
}

impl KeyValueStore for JsonFileStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut document = self.read_document()?;
        Ok(document.remove(key))
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.update(|document| {
            document.insert(key.to_string(), value.to_string());
        })
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.update(|document| {
            document.remove(key);
        })
    }
}
