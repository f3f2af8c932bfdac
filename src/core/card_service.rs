//! Card service
//!
//! This module provides the CardService that orchestrates card operations by
//! coordinating between a [`CardStore`], the validator and the [`ChargeService`].
//!
//! Each store operation reloads the whole document; nothing is cached between
//! calls.
//!
//! # Known Gap
//!
//! `save_for_user` is a load / find / insert-or-update / save sequence with no
//! lock held across it. Two concurrent saves for the same username can both see
//! "absent" and insert duplicate entries, or one save can overwrite the
//! document the other just wrote. Callers that need stronger guarantees must
//! serialize saves themselves or supply a transactional `CardStore`.

use crate::core::charge::ChargeService;
use crate::core::traits::{CardStore, SaveOutcome};
use crate::core::validator;
use crate::types::{CardRecord, ConfirmationCode, Result};
use rust_decimal::Decimal;
use std::time::Duration;
use tracing::debug;

/// Card service orchestrating storage, validation and charging
#[derive(Debug)]
pub struct CardService<S: CardStore> {
    store: S,
    charges: ChargeService,
}

impl<S: CardStore> CardService<S> {
    /// Create a new CardService
    ///
    /// # Arguments
    ///
    /// * `store` - Storage backend for card records
    /// * `charges` - Charge service used by the charge operations
    pub fn new(store: S, charges: ChargeService) -> Self {
        CardService { store, charges }
    }

    /// The underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Load the card on file for `username`
    ///
    /// # Returns
    ///
    /// * `Ok(CardRecord)` - The stored card, or `CardRecord::default()` if the
    ///   user has no complete card on file (check [`CardRecord::is_empty`])
    /// * `Err(CardError)` - If the backing file could not be read or recreated
    pub fn load_for_user(&self, username: &str) -> Result<CardRecord> {
        let document = self.store.load()?;
        let record = self
            .store
            .find_record(&document, username)
            .unwrap_or_default();

        debug!(username, on_file = !record.is_empty(), "Loaded card for user");
        Ok(record)
    }

    /// Insert or update the card for `record.username`
    ///
    /// An existing entry is updated in place; otherwise a new entry is appended.
    /// The document is saved in either case.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The entry vanished between lookup and update (`RecordNotFound`)
    /// - The loaded document has no root container (`StorageUnavailable`)
    /// - The backing file could not be recreated after a failed write (`Io`)
    pub fn save_for_user(&self, record: &CardRecord) -> Result<SaveOutcome> {
        let mut document = self.store.load()?;

        match self.store.find_record(&document, &record.username) {
            Some(_) => self.store.update(&mut document, record)?,
            None => self.store.insert(&mut document, record)?,
        }

        self.store.save(&document)
    }

    /// Whether `record` is unexpired and passes the Luhn checksum
    pub fn is_valid(&self, record: &CardRecord) -> bool {
        validator::is_valid(record)
    }

    /// Charge `amount`, waiting for the gateway however long it takes
    pub async fn charge_card(&self, amount: Decimal) -> Result<ConfirmationCode> {
        self.charges.charge_card(amount).await
    }

    /// Charge `amount`, failing with `CardError::Timeout` after `timeout`
    pub async fn charge_card_with_timeout(
        &self,
        amount: Decimal,
        timeout: Duration,
    ) -> Result<ConfirmationCode> {
        self.charges.charge_card_with_timeout(amount, timeout).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::charge::ChargeConfig;
    use crate::io::{CardDocument, JsonFileStore};
    use crate::types::CardError;
    use chrono::{Duration as Days, Local, NaiveDate};
    use std::cell::Cell;
    use tempfile::TempDir;

    fn service_in(dir: &TempDir) -> CardService<JsonFileStore> {
        CardService::new(
            JsonFileStore::new(dir.path().join("cards.json")),
            ChargeService::simulated(&ChargeConfig::default()),
        )
    }

    fn card(username: &str, number: &str) -> CardRecord {
        CardRecord::new(
            username,
            number,
            NaiveDate::from_ymd_opt(2032, 12, 31).unwrap(),
        )
    }

    /// Store whose entries disappear between lookup and update
    struct VanishingStore {
        inner: JsonFileStore,
        updates: Cell<usize>,
    }

    impl CardStore for VanishingStore {
        fn load(&self) -> Result<CardDocument> {
            self.inner.load()
        }

        fn find_record(&self, document: &CardDocument, username: &str) -> Option<CardRecord> {
            self.inner.find_record(document, username)
        }

        fn insert(&self, document: &mut CardDocument, record: &CardRecord) -> Result<()> {
            self.inner.insert(document, record)
        }

        fn update(&self, _document: &mut CardDocument, record: &CardRecord) -> Result<()> {
            self.updates.set(self.updates.get() + 1);
            self.inner.update(&mut CardDocument::empty(), record)
        }

        fn save(&self, document: &CardDocument) -> Result<SaveOutcome> {
            self.inner.save(document)
        }
    }

    /// Store whose documents never carry a root container
    struct RootlessStore;

    impl CardStore for RootlessStore {
        fn load(&self) -> Result<CardDocument> {
            Ok(CardDocument::without_root())
        }

        fn find_record(&self, document: &CardDocument, username: &str) -> Option<CardRecord> {
            document.find(username)
        }

        fn insert(&self, document: &mut CardDocument, _record: &CardRecord) -> Result<()> {
            if document.has_root() {
                Ok(())
            } else {
                Err(CardError::storage_unavailable(std::path::Path::new("memory")))
            }
        }

        fn update(&self, _document: &mut CardDocument, record: &CardRecord) -> Result<()> {
            Err(CardError::record_not_found(&record.username))
        }

        fn save(&self, _document: &CardDocument) -> Result<SaveOutcome> {
            panic!("save must not be reached after a failed insert");
        }
    }

    #[test]
    fn test_load_for_unknown_user_returns_empty_record() {
        let dir = TempDir::new().unwrap();
        let service = service_in(&dir);

        let record = service.load_for_user("nobody").unwrap();

        assert!(record.is_empty());
        assert_eq!(record, CardRecord::default());
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let service = service_in(&dir);
        let original = card("alice", "0045 3201 5112 8303");

        assert_eq!(service.save_for_user(&original).unwrap(), SaveOutcome::Persisted);

        assert_eq!(service.load_for_user("alice").unwrap(), original);
    }

    #[test]
    fn test_repeated_save_updates_instead_of_duplicating() {
        let dir = TempDir::new().unwrap();
        let service = service_in(&dir);

        service.save_for_user(&card("alice", "4111")).unwrap();
        service.save_for_user(&card("alice", "5500")).unwrap();
        service.save_for_user(&card("bob", "6011")).unwrap();

        let document = service.store().load().unwrap();
        assert_eq!(document.entry_count("alice"), 1);
        assert_eq!(document.entry_count("bob"), 1);
        assert_eq!(service.load_for_user("alice").unwrap(), card("alice", "5500"));
    }

    #[test]
    fn test_save_propagates_record_not_found_from_racing_update() {
        let dir = TempDir::new().unwrap();
        let inner = JsonFileStore::new(dir.path().join("cards.json"));
        let mut document = inner.load().unwrap();
        inner.insert(&mut document, &card("alice", "4111")).unwrap();
        inner.save(&document).unwrap();

        let store = VanishingStore {
            inner,
            updates: Cell::new(0),
        };
        let service = CardService::new(store, ChargeService::simulated(&ChargeConfig::default()));

        let result = service.save_for_user(&card("alice", "5500"));

        assert_eq!(result, Err(CardError::record_not_found("alice")));
        assert_eq!(service.store().updates.get(), 1);
    }

    #[test]
    fn test_save_into_rootless_store_is_storage_unavailable() {
        let service = CardService::new(
            RootlessStore,
            ChargeService::simulated(&ChargeConfig::default()),
        );

        let result = service.save_for_user(&card("alice", "4111"));

        assert!(matches!(result, Err(CardError::StorageUnavailable { .. })));
    }

    #[test]
    fn test_is_valid_uses_today() {
        let dir = TempDir::new().unwrap();
        let service = service_in(&dir);
        let today = Local::now().date_naive();

        let current = CardRecord::new("alice", "4532015112830366", today + Days::days(30));
        let expired = CardRecord::new("alice", "4532015112830366", today - Days::days(1));

        assert!(service.is_valid(&current));
        assert!(!service.is_valid(&expired));
    }

    #[tokio::test(start_paused = true)]
    async fn test_charge_operations_delegate() {
        let dir = TempDir::new().unwrap();
        let service = service_in(&dir);

        let code = service.charge_card(Decimal::new(500, 2)).await.unwrap();
        assert_eq!(code.as_str().len(), 6);

        let result = service
            .charge_card_with_timeout(Decimal::new(500, 2), Duration::ZERO)
            .await;
        assert!(matches!(result, Err(CardError::Timeout { .. })));
    }
}
