//! JSON file-backed card store
//!
//! `JsonFileStore` treats a single JSON file as the whole database. Each call
//! reads or writes the full document; nothing is cached between calls.
//!
//! # Self-Healing Reads
//!
//! A backing file that is missing, unreadable, empty, malformed or lacks the
//! root container is replaced by an empty document, which is written to disk
//! and returned. Callers never see a corruption error.
//!
//! # Writes
//!
//! Documents are written to a temporary file in the same directory and renamed
//! over the target, so concurrent readers see either the old or the new
//! document, never a torn one. The temporary file takes over the permissions
//! of the file it replaces.
//!
//! A write that fails because its target vanished (the directory was removed)
//! resets the store to an empty document and reports
//! [`SaveOutcome::Recovered`]; the pending write is not retried. Any other
//! write failure (disk full, I/O error) is returned as `CardError::Io` and the
//! backing file is left as it was.
//!
//! # Concurrency
//!
//! The load/modify/save cycle holds no lock. Two writers working from the same
//! snapshot can both insert the same username or overwrite each other's update.

use crate::core::traits::{CardStore, SaveOutcome};
use crate::io::document::{CardDocument, CardEntry};
use crate::types::{CardError, CardRecord, Result};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// Card store persisted as one JSON document on disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    /// Location of the backing file
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store backed by the file at `path`
    ///
    /// Nothing is touched on disk until the first `load` or `save`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        JsonFileStore {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the backing file, describing why it is unusable on failure
    fn read_document(&self) -> std::result::Result<CardDocument, String> {
        let text = fs::read_to_string(&self.path).map_err(|e| e.to_string())?;
        CardDocument::parse(&text).ok_or_else(|| "empty or malformed card document".to_string())
    }

    /// Directory that holds the backing file and its temporary siblings
    fn directory(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// Atomically replace the backing file with `bytes`
    fn write_bytes(&self, bytes: &[u8]) -> io::Result<()> {
        let mut temp = NamedTempFile::new_in(self.directory())?;
        temp.write_all(bytes)?;
        if let Ok(metadata) = fs::metadata(&self.path) {
            temp.as_file().set_permissions(metadata.permissions())?;
        }
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| e.error)?;

        Ok(())
    }

    /// Replace the backing file with an empty document
    fn recreate(&self) -> Result<CardDocument> {
        fs::create_dir_all(self.directory())?;

        let document = CardDocument::empty();
        self.write_bytes(document.to_json()?.as_bytes())?;
        info!(path = %self.path.display(), "Created empty card store");

        Ok(document)
    }

    /// Run `write` for `document` and decide what its failure means
    ///
    /// Only a vanished target (`NotFound`) triggers recovery.
    fn commit<W>(&self, document: &CardDocument, write: W) -> Result<SaveOutcome>
    where
        W: FnOnce() -> io::Result<()>,
    {
        match write() {
            Ok(()) => {
                debug!(
                    path = %self.path.display(),
                    entries = document.entries().len(),
                    "Saved card document"
                );
                Ok(SaveOutcome::Persisted)
            }
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                warn!(
                    path = %self.path.display(),
                    %error,
                    "Card document target vanished, recreating empty store; pending write discarded"
                );
                self.recreate()?;
                Ok(SaveOutcome::Recovered)
            }
            Err(error) => {
                warn!(
                    path = %self.path.display(),
                    %error,
                    "Card document write failed, backing file left unchanged"
                );
                Err(error.into())
            }
        }
    }
}

impl CardStore for JsonFileStore {
    fn load(&self) -> Result<CardDocument> {
        match self.read_document() {
            Ok(document) => {
                debug!(
                    path = %self.path.display(),
                    entries = document.entries().len(),
                    "Loaded card document"
                );
                Ok(document)
            }
            Err(reason) => {
                warn!(
                    path = %self.path.display(),
                    %reason,
                    "Card document unusable, recreating empty store"
                );
                self.recreate()
            }
        }
    }

    fn find_record(&self, document: &CardDocument, username: &str) -> Option<CardRecord> {
        let record = document.find(username);
        debug!(username, found = record.is_some(), "Looked up card");
        record
    }

    fn insert(&self, document: &mut CardDocument, record: &CardRecord) -> Result<()> {
        if !document.append(CardEntry::from_record(record)) {
            return Err(CardError::storage_unavailable(&self.path));
        }

        info!(username = %record.username, "Inserted card entry");
        Ok(())
    }

    fn update(&self, document: &mut CardDocument, record: &CardRecord) -> Result<()> {
        if !document.overwrite(record) {
            return Err(CardError::record_not_found(&record.username));
        }

        info!(username = %record.username, "Updated card entry");
        Ok(())
    }

    fn save(&self, document: &CardDocument) -> Result<SaveOutcome> {
        let json = document.to_json()?;
        self.commit(document, || self.write_bytes(json.as_bytes()))
    }
}
