//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `card`: The card record, expiry helpers and confirmation codes
//! - `error`: Error types for the card vault

pub mod card;
pub mod error;

pub use card::{end_of_month, parse_expiry, CardRecord, ConfirmationCode, EXPIRY_FORMAT};
pub use error::{CardError, Result};
