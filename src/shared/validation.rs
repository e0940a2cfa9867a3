use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use validator::ValidationError;

use crate::shared::constants::{MAX_PRICE, MIN_PRICE};

lazy_static! {
    /// Regex for validating phone numbers
    /// Optional leading plus, then digits with optional spaces or hyphens
    /// - Valid: "180660487123", "+85212345678", "2345-6789"
    /// - Invalid: "", "phone", "12ab34", "--"
    pub static ref PHONE_NUMBER_REGEX: Regex = Regex::new(r"^\+?[0-9][0-9 -]*$").unwrap();
}

/// Price must lie within `MIN_PRICE..=MAX_PRICE`
pub fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price < Decimal::from(MIN_PRICE) || *price > Decimal::from(MAX_PRICE) {
        let mut err = ValidationError::new("price_range");
        err.message = Some(format!("Price must be between {} and {}", MIN_PRICE, MAX_PRICE).into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_number_regex_valid() {
        assert!(PHONE_NUMBER_REGEX.is_match("180660487123"));
        assert!(PHONE_NUMBER_REGEX.is_match("+85212345678"));
        assert!(PHONE_NUMBER_REGEX.is_match("2345-6789"));
        assert!(PHONE_NUMBER_REGEX.is_match("2345 6789"));
    }

    #[test]
    fn test_phone_number_regex_invalid() {
        assert!(!PHONE_NUMBER_REGEX.is_match(""));
        assert!(!PHONE_NUMBER_REGEX.is_match("phone"));
        assert!(!PHONE_NUMBER_REGEX.is_match("12ab34"));
        assert!(!PHONE_NUMBER_REGEX.is_match("--"));
        assert!(!PHONE_NUMBER_REGEX.is_match("++123"));
    }

    #[test]
    fn test_validate_price_bounds() {
        assert!(validate_price(&Decimal::from(0)).is_ok());
        assert!(validate_price(&Decimal::from(100_000)).is_ok());
        assert!(validate_price(&Decimal::new(250050, 2)).is_ok()); // 2500.50
        assert!(validate_price(&Decimal::from(-1)).is_err());
        assert!(validate_price(&Decimal::new(10000001, 2)).is_err()); // 100000.01
    }
}
