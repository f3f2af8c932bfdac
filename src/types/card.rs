//! Card-related types for the card vault
//!
//! This module defines the in-memory card record, the expiry helpers used to
//! build and parse expiry dates, and the confirmation code issued by a charge.

use chrono::{Datelike, NaiveDate};
use rand::rngs::OsRng;
use rand::Rng;
use std::fmt;

/// Text format used to persist expiry dates
pub const EXPIRY_FORMAT: &str = "%Y-%m-%d";

/// Number of digits in a confirmation code
pub const CONFIRMATION_CODE_DIGITS: usize = 6;

/// A single user's card on file
///
/// The username is the unique key within a store. The number is kept exactly
/// as entered (formatting characters and leading zeros included); whether it is
/// a well-formed card number is a separate check, see [`crate::core::validator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardRecord {
    /// Identifying username (unique key within the store)
    pub username: String,

    /// Card number as entered, possibly with spaces or dashes
    pub number: String,

    /// Last valid day of the card
    ///
    /// The card is invalid on any day strictly after this date.
    pub expiry: NaiveDate,
}

impl CardRecord {
    /// Create a new card record
    pub fn new(username: impl Into<String>, number: impl Into<String>, expiry: NaiveDate) -> Self {
        CardRecord {
            username: username.into(),
            number: number.into(),
            expiry,
        }
    }

    /// Whether this record is the "no card on file" default
    ///
    /// `load_for_user` returns the default record when nothing is stored for a
    /// username, so callers check this instead of matching on an error.
    pub fn is_empty(&self) -> bool {
        self.username.is_empty() && self.number.is_empty()
    }

    /// Card number reduced to its last four digits, e.g. `**** 0366`
    pub fn masked_number(&self) -> String {
        let digits: Vec<char> = self.number.chars().filter(char::is_ascii_digit).collect();
        let tail: String = digits[digits.len().saturating_sub(4)..].iter().collect();
        format!("**** {}", tail)
    }

    /// Expiry rendered in the persisted text format
    pub fn expiry_text(&self) -> String {
        self.expiry.format(EXPIRY_FORMAT).to_string()
    }
}

impl Default for CardRecord {
    /// Empty username and number with the zero-value expiry
    fn default() -> Self {
        CardRecord {
            username: String::new(),
            number: String::new(),
            expiry: NaiveDate::MIN,
        }
    }
}

/// Last day of the given calendar month
///
/// A card printed with `MM/YY` stays valid through the end of that month, so
/// the stored expiry is the month's final day.
///
/// Returns `None` if `month` is outside 1..=12 or the year is out of range.
pub fn end_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_month = if first.month() == 12 {
        NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    next_month.pred_opt()
}

/// Parse an expiry from user input
///
/// Accepts `YYYY-MM-DD` (taken verbatim) or `YYYY-MM` (end of that month).
pub fn parse_expiry(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(input, EXPIRY_FORMAT) {
        return Some(date);
    }

    let (year, month) = input.split_once('-')?;
    end_of_month(year.parse().ok()?, month.parse().ok()?)
}

/// Six-digit confirmation code returned by a successful charge
///
/// Codes stand in for an authorization token, so they are drawn from the
/// operating system's CSPRNG rather than a seedable generator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfirmationCode(String);

impl ConfirmationCode {
    /// Draw a fresh zero-padded code from `OsRng`
    pub fn generate() -> Self {
        let value: u32 = OsRng.gen_range(0..1_000_000);
        ConfirmationCode(format!("{:0width$}", value, width = CONFIRMATION_CODE_DIGITS))
    }

    /// The code as text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfirmationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
