//! I/O module
//!
//! Handles the backing file of the card store.
//!
//! # Components
//!
//! - `document` - Document model of the backing file (entries, root container, JSON text)
//! - `file_store` - JSON file-backed implementation of the card store

pub mod document;
pub mod file_store;

pub use document::{CardDocument, CardEntry};
pub use file_store::JsonFileStore;
