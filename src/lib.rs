//! Card Vault Library
//! # Overview
//!
//! This library keeps one credit card per user in a shared JSON file, validates
//! cards, and simulates time-bounded charges against them.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (CardRecord, ConfirmationCode, CardError)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Business logic components:
//!   - [`core::card_service`] - Orchestration of load, save, validate and charge
//!   - [`core::validator`] - Expiry and Luhn checksum validation
//!   - [`core::charge`] - Simulated charging raced against a timeout
//! - [`io`] - The backing file: document model and the JSON file store
//!
//! # Operations
//!
//! - **load_for_user**: Read the card on file for a username (empty record if none)
//! - **save_for_user**: Insert the card, or update it in place if one exists
//! - **is_valid**: Unexpired and Luhn-valid
//! - **charge_card**: Issue a six-digit confirmation code
//! - **charge_card_with_timeout**: Same, failing with a timeout if the charge is too slow
//!
//! # Storage
//!
//! A missing or corrupt backing file is silently replaced by an empty store.
//! Saves are not atomic with respect to each other: concurrent saves of the same
//! username can race (see [`core::card_service`]).

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod types;

pub use crate::core::{
    CardService, CardStore, ChargeConfig, ChargeGateway, ChargeService, SaveOutcome,
    SimulatedGateway,
};
pub use crate::io::{CardDocument, CardEntry, JsonFileStore};
pub use crate::types::{CardError, CardRecord, ConfirmationCode, Result};
