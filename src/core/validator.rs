//! Card validation
//!
//! Validation is a query, never an error: a card either passes both the expiry
//! and the Luhn checks or it does not. The Luhn checksum only catches typos;
//! no issuer is contacted.

use crate::types::CardRecord;
use chrono::{Local, NaiveDate};

/// Validate a card against today's date in the local time zone
pub fn is_valid(record: &CardRecord) -> bool {
    is_valid_on(record, today())
}

/// Today's date in the local time zone
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Validate a card against the given date
///
/// Returns `false` if the expiry is strictly before `today`, if the number is
/// empty, or if its digits fail the Luhn checksum.
pub fn is_valid_on(record: &CardRecord, today: NaiveDate) -> bool {
    if record.expiry < today || record.number.is_empty() {
        return false;
    }

    luhn_valid(&normalize_number(&record.number))
}

/// Strip every non-digit character from a card number
pub fn normalize_number(number: &str) -> String {
    number.chars().filter(char::is_ascii_digit).collect()
}

/// Luhn checksum over a string of ASCII digits
///
/// Every second digit from the right (starting with the second-to-last) is
/// doubled, with 9 subtracted from results above 9. The number passes if the
/// digit sum is a multiple of 10. Empty input or any non-digit fails.
pub fn luhn_valid(digits: &str) -> bool {
    if digits.is_empty() {
        return false;
    }

    let mut sum: u32 = 0;
    for (index, c) in digits.chars().rev().enumerate() {
        let Some(mut digit) = c.to_digit(10) else {
            return false;
        };
        if index % 2 == 1 {
            digit *= 2;
            if digit > 9 {
                digit -= 9;
            }
        }
        sum += digit;
    }

    sum % 10 == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn reference_day() -> NaiveDate {
        date(2026, 10, 19)
    }

    #[rstest]
    #[case::visa_test_number("4532015112830366", true)]
    #[case::altered_last_digit("4532015112830367", false)]
    #[case::classic_visa("4111111111111111", true)]
    #[case::amex("378282246310005", true)]
    #[case::single_zero("0", true)]
    #[case::doubling_overflow("59", true)]
    #[case::transposed("4532015112830636", false)]
    #[case::empty("", false)]
    #[case::non_digit("4532a15112830366", false)]
    fn test_luhn_valid(#[case] digits: &str, #[case] expected: bool) {
        assert_eq!(luhn_valid(digits), expected);
    }

    #[rstest]
    #[case::spaces("4532 0151 1283 0366", "4532015112830366")]
    #[case::dashes("4532-0151-1283-0366", "4532015112830366")]
    #[case::letters_only("card", "")]
    #[case::leading_zeros("0042", "0042")]
    fn test_normalize_number(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_number(input), expected);
    }

    #[rstest]
    #[case::future_and_luhn_valid("4532015112830366", date(2027, 1, 31), true)]
    #[case::formatted_number("4532 0151-1283 0366", date(2027, 1, 31), true)]
    #[case::expires_today("4532015112830366", reference_day(), true)]
    #[case::expired_yesterday("4532015112830366", date(2026, 10, 18), false)]
    #[case::long_expired("4532015112830366", date(2001, 1, 31), false)]
    #[case::luhn_invalid("4532015112830367", date(2027, 1, 31), false)]
    #[case::empty_number("", date(2027, 1, 31), false)]
    #[case::no_digits_left("----", date(2027, 1, 31), false)]
    fn test_is_valid_on(#[case] number: &str, #[case] expiry: NaiveDate, #[case] expected: bool) {
        let record = CardRecord::new("alice", number, expiry);
        assert_eq!(is_valid_on(&record, reference_day()), expected);
    }

    #[rstest]
    fn test_past_expiry_is_invalid_regardless_of_number(
        #[values("4532015112830366", "4111111111111111", "4532015112830367", "")] number: &str,
    ) {
        let record = CardRecord::new("alice", number, date(2020, 5, 31));
        assert!(!is_valid_on(&record, reference_day()));
    }

    #[test]
    fn test_today_is_the_local_calendar_date() {
        assert_eq!(today(), Local::now().date_naive());
    }

    #[test]
    fn test_card_expiring_on_local_today_is_valid() {
        let expires_today = CardRecord::new("alice", "4532015112830366", today());
        let expired = CardRecord::new("alice", "4532015112830366", today().pred_opt().unwrap());

        assert!(is_valid(&expires_today));
        assert!(!is_valid(&expired));
    }

    #[test]
    fn test_default_record_is_invalid() {
        assert!(!is_valid(&CardRecord::default()));
    }
}
