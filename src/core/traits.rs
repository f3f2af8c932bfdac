//! Core traits for card storage and charging
//!
//! These traits are the seams of the crate: the orchestrator only talks to
//! storage through [`CardStore`] and to the payment side through
//! [`ChargeGateway`], so a transactional store or a real gateway can be dropped
//! in without changing callers.

use crate::io::CardDocument;
use crate::types::{CardRecord, ConfirmationCode, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;

/// How a save ended
///
/// Neither variant is an error. `Recovered` means the write could not be
/// completed, the store recreated an empty document in its place, and the
/// pending changes were discarded; re-invoke the save against a freshly loaded
/// document to persist them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The document was written in full
    Persisted,
    /// The write failed and the store was reset to an empty document
    Recovered,
}

/// Trait for a whole-document card store
///
/// Every operation works on a full in-memory copy of the document; there is no
/// partial access and no caching between calls.
pub trait CardStore {
    /// Read the backing document, recreating an empty one if it is missing or corrupt
    fn load(&self) -> Result<CardDocument>;

    /// Find the first complete record keyed by exactly `username`
    fn find_record(&self, document: &CardDocument, username: &str) -> Option<CardRecord>;

    /// Append a new entry for `record`
    fn insert(&self, document: &mut CardDocument, record: &CardRecord) -> Result<()>;

    /// Rewrite the number and expiry of the existing entry for `record.username`
    fn update(&self, document: &mut CardDocument, record: &CardRecord) -> Result<()>;

    /// Overwrite the backing file with `document`
    fn save(&self, document: &CardDocument) -> Result<SaveOutcome>;
}

/// Trait for something that can authorize a charge
#[async_trait]
pub trait ChargeGateway: Send + Sync {
    /// Charge `amount` and return the authorization's confirmation code
    async fn charge(&self, amount: Decimal) -> Result<ConfirmationCode>;
}
