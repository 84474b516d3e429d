//! Phone-number format rule.
//!
//! A narrow allow-list: UK numbers only, written as `+44` followed by a
//! 10-digit subscriber number. This is not a telephony parser.

/// Country calling code accepted for registration.
pub const COUNTRY_CODE: &str = "44";

/// Total digit count, country code included, `+` excluded.
pub const TOTAL_DIGITS: usize = 12;

/// Returns true if `phone_number` is `+44` followed by digits, 12 digits total.
///
/// Malformed input yields `false`, never an error.
pub fn is_valid(phone_number: &str) -> bool {
    let Some(digits) = phone_number.strip_prefix('+') else {
        return false;
    };

    digits.len() == TOTAL_DIGITS
        && digits.starts_with(COUNTRY_CODE)
        && digits.bytes().all(|b| b.is_ascii_digit())
}
