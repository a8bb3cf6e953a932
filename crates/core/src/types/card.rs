//! Pure card-number helpers: brand detection, masking, formatting and
//! expiration/CVV validation.
//!
//! Brand detection uses fixed numeric-prefix rules and never makes an
//! external call. None of these functions retain the card number.

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Card network inferred from the leading digits of a card number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CardBrand {
    Visa,
    Mastercard,
    Amex,
    Discover,
    #[default]
    Unknown,
}

impl CardBrand {
    /// Detect the card brand from the number's leading digits.
    ///
    /// Rules: Visa `4`; Mastercard `51-55` and `2221-2720`; Amex `34`/`37`;
    /// Discover `6011`, `622126-622925`, `644-649` and `65`. Anything else
    /// is [`CardBrand::Unknown`]. Spaces and dashes in the input are
    /// ignored.
    #[must_use]
    pub fn detect(number: &str) -> Self {
        let digits = digits_of(number);

        if digits.starts_with('4') {
            return Self::Visa;
        }
        if matches!(prefix(&digits, 2), Some(51..=55))
            || matches!(prefix(&digits, 4), Some(2221..=2720))
        {
            return Self::Mastercard;
        }
        if matches!(prefix(&digits, 2), Some(34 | 37)) {
            return Self::Amex;
        }
        if matches!(prefix(&digits, 4), Some(6011))
            || matches!(prefix(&digits, 6), Some(622_126..=622_925))
            || matches!(prefix(&digits, 3), Some(644..=649))
            || matches!(prefix(&digits, 2), Some(65))
        {
            return Self::Discover;
        }

        Self::Unknown
    }

    /// Expected CVV length for this brand (4 for Amex, 3 otherwise).
    #[must_use]
    pub const fn cvv_length(&self) -> usize {
        match self {
            Self::Amex => 4,
            _ => 3,
        }
    }
}

impl std::fmt::Display for CardBrand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Visa => "visa",
            Self::Mastercard => "mastercard",
            Self::Amex => "amex",
            Self::Discover => "discover",
            Self::Unknown => "unknown",
        };
        write!(f, "{name}")
    }
}

/// Keep only ASCII digits from a card-number input.
fn digits_of(number: &str) -> String {
    number.chars().filter(char::is_ascii_digit).collect()
}

/// The first `len` digits as a number, if that many digits exist.
fn prefix(digits: &str, len: usize) -> Option<u32> {
    digits.get(..len)?.parse().ok()
}

/// Luhn checksum validation over the digits of `number`.
///
/// Returns `false` for inputs with fewer than 12 digits or any
/// non-digit/non-separator characters stripped away to nothing.
#[must_use]
pub fn luhn_valid(number: &str) -> bool {
    let digits = digits_of(number);
    if digits.len() < 12 {
        return false;
    }

    let sum: u32 = digits
        .chars()
        .rev()
        .filter_map(|c| c.to_digit(10))
        .enumerate()
        .map(|(i, d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum();

    sum % 10 == 0
}

/// Mask a card number down to its last four digits.
///
/// `"4111 1111 1111 1111"` becomes `"****-****-****-1111"`.
#[must_use]
pub fn mask_card_number(number: &str) -> String {
    let digits = digits_of(number);
    let last4 = if digits.len() >= 4 {
        digits.get(digits.len() - 4..).unwrap_or(&digits)
    } else {
        &digits
    };
    format!("****-****-****-{last4}")
}

/// Format a card number into digit groups of four separated by spaces.
#[must_use]
pub fn format_card_number(number: &str) -> String {
    let digits = digits_of(number);
    digits
        .as_bytes()
        .chunks(4)
        .filter_map(|chunk| std::str::from_utf8(chunk).ok())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format raw expiration input as `MM/YY`.
///
/// `"1225"` becomes `"12/25"`. Inputs of two digits or fewer are returned
/// as-is; extra digits beyond four are dropped.
#[must_use]
pub fn format_expiration_date(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).take(4).collect();
    if digits.len() <= 2 {
        return digits;
    }
    let (month, year) = digits.split_at(2);
    format!("{month}/{year}")
}

/// Validate an `MM/YY` expiration against a given date.
///
/// The card is valid through the end of its expiration month: a date
/// earlier than the current month/year fails.
#[must_use]
pub fn validate_expiration_at(expiration: &str, today: NaiveDate) -> bool {
    let Some((month_str, year_str)) = expiration.split_once('/') else {
        return false;
    };
    let (Ok(month), Ok(year)) = (month_str.parse::<u32>(), year_str.parse::<i32>()) else {
        return false;
    };
    if !(1..=12).contains(&month) || year_str.len() != 2 {
        return false;
    }

    let year = 2000 + year;
    (year, month) >= (today.year(), today.month())
}

/// Validate an `MM/YY` expiration against the current date.
#[must_use]
pub fn validate_expiration(expiration: &str) -> bool {
    validate_expiration_at(expiration, Utc::now().date_naive())
}

/// Validate a CVV for the given brand: digits only, 3 long (4 for Amex).
#[must_use]
pub fn validate_cvv(cvv: &str, brand: CardBrand) -> bool {
    cvv.len() == brand.cvv_length() && cvv.chars().all(|c| c.is_ascii_digit())
}
