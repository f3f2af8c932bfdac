//! Backing-file document model
//!
//! The backing file is a JSON document with a single root container, `cards`,
//! holding zero or more entries:
//!
//! ```json
//! {
//!   "cards": [
//!     { "username": "alice", "number": "4532015112830366", "expiry": "2030-01-31" }
//!   ]
//! }
//! ```
//!
//! Every entry field is stored as text so card numbers keep their leading zeros
//! and expiry values round-trip exactly as written. Fields are optional on disk:
//! an entry missing a field still loads, but it is never returned as a record.
//!
//! All functions here are pure (no I/O); the file handling lives in
//! [`super::file_store`].

use crate::types::{CardRecord, Result, EXPIRY_FORMAT};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One card entry as stored under the root container
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CardEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry: Option<String>,
}

impl CardEntry {
    /// Build an entry holding all three fields of a record
    pub fn from_record(record: &CardRecord) -> Self {
        CardEntry {
            username: Some(record.username.clone()),
            number: Some(record.number.clone()),
            expiry: Some(record.expiry_text()),
        }
    }

    /// Whether this entry is keyed by exactly `username`
    pub fn matches(&self, username: &str) -> bool {
        self.username.as_deref() == Some(username)
    }

    /// Convert to a record if every field is populated
    ///
    /// Partial entries (missing or empty number, missing or unparseable
    /// expiry) yield `None`.
    pub fn to_record(&self) -> Option<CardRecord> {
        let username = self.username.as_deref().filter(|u| !u.is_empty())?;
        let number = self.number.as_deref().filter(|n| !n.is_empty())?;
        let expiry = NaiveDate::parse_from_str(self.expiry.as_deref()?, EXPIRY_FORMAT).ok()?;

        Some(CardRecord::new(username, number, expiry))
    }

    /// Rewrite number and expiry in place, leaving the key untouched
    fn overwrite_body(&mut self, record: &CardRecord) {
        self.number = Some(record.number.clone());
        self.expiry = Some(record.expiry_text());
    }
}

/// In-memory tree of the backing file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDocument {
    /// Root container; `None` only for documents built without one
    #[serde(rename = "cards", skip_serializing_if = "Option::is_none")]
    root: Option<Vec<CardEntry>>,
}

impl CardDocument {
    /// A rooted document with no entries
    pub fn empty() -> Self {
        CardDocument {
            root: Some(Vec::new()),
        }
    }

    /// A document lacking its root container
    ///
    /// Inserting into such a document fails with `StorageUnavailable`.
    pub fn without_root() -> Self {
        CardDocument { root: None }
    }

    /// Parse a document from backing-file text
    ///
    /// Returns `None` for empty text, malformed JSON, or a document without
    /// the `cards` root container; the store treats all of these as corrupt.
    pub fn parse(text: &str) -> Option<Self> {
        let document: CardDocument = serde_json::from_str(text).ok()?;
        document.has_root().then_some(document)
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    /// Whether the root container is present
    pub fn has_root(&self) -> bool {
        self.root.is_some()
    }

    /// All entries under the root, in file order
    pub fn entries(&self) -> &[CardEntry] {
        self.root.as_deref().unwrap_or_default()
    }

    /// Number of entries keyed by `username`
    pub fn entry_count(&self, username: &str) -> usize {
        self.entries().iter().filter(|e| e.matches(username)).count()
    }

    /// First complete record keyed by exactly `username`
    pub fn find(&self, username: &str) -> Option<CardRecord> {
        self.entries()
            .iter()
            .filter(|entry| entry.matches(username))
            .find_map(CardEntry::to_record)
    }

    /// Append an entry under the root
    ///
    /// Returns `false` (and leaves the document untouched) when there is no
    /// root container.
    pub fn append(&mut self, entry: CardEntry) -> bool {
        match self.root.as_mut() {
            Some(entries) => {
                entries.push(entry);
                true
            }
            None => false,
        }
    }

    /// Rewrite the body of the entry keyed by `record.username`
    ///
    /// Targets the same entry [`CardDocument::find`] would return. Partial
    /// entries are never touched; returns `false` when no complete entry has
    /// the key.
    pub fn overwrite(&mut self, record: &CardRecord) -> bool {
        let Some(entries) = self.root.as_mut() else {
            return false;
        };

        let position = entries
            .iter()
            .position(|e| e.matches(&record.username) && e.to_record().is_some());

        match position {
            Some(index) => {
                entries[index].overwrite_body(record);
                true
            }
            None => false,
        }
    }
}
