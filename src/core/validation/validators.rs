//! Reusable field validators
//!
//! Validators run on already-normalized values and report the
//! [`ValidationError`] the caller associates with the field.

use crate::core::error::ValidationError;

/// Validator: field must be non-empty
pub fn required(value: &str, error: ValidationError) -> Result<(), ValidationError> {
    if value.is_empty() { Err(error) } else { Ok(()) }
}

/// Validator: optional non-negative base-10 integer
///
/// An empty string means the field was not supplied. Accepts an optional
/// sign followed by ASCII digits; any magnitude counts as an integer, so a
/// negative value is always `OdometerNegative` however long it is. `-0` is
/// zero. A non-negative value above `u64::MAX` cannot be stored and is
/// reported as `OdometerNotInteger`.
pub fn optional_non_negative_integer(value: &str) -> Result<Option<u64>, ValidationError> {
    if value.is_empty() {
        return Ok(None);
    }

    let (negative, digits) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value.strip_prefix('+').unwrap_or(value)),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::OdometerNotInteger);
    }
    if negative && digits.bytes().any(|b| b != b'0') {
        return Err(ValidationError::OdometerNegative);
    }

    digits
        .parse::<u64>()
        .map(Some)
        .map_err(|_| ValidationError::OdometerNotInteger)
}

#[cfg(test)]
mod tests {
    use super::*;

    // === required() ===

    #[test]
    fn test_required_empty_returns_error() {
        assert_eq!(
            required("", ValidationError::PlateRequired),
            Err(ValidationError::PlateRequired)
        );
    }

    #[test]
    fn test_required_non_empty_returns_ok() {
        assert!(required("ABC1234", ValidationError::PlateRequired).is_ok());
    }

    // === optional_non_negative_integer() ===

    #[test]
    fn test_odometer_empty_is_absent() {
        assert_eq!(optional_non_negative_integer(""), Ok(None));
    }

    #[test]
    fn test_odometer_zero_is_valid() {
        assert_eq!(optional_non_negative_integer("0"), Ok(Some(0)));
    }

    #[test]
    fn test_odometer_negative_returns_error() {
        assert_eq!(
            optional_non_negative_integer("-5"),
            Err(ValidationError::OdometerNegative)
        );
    }

    #[test]
    fn test_odometer_non_numeric_returns_error() {
        assert_eq!(
            optional_non_negative_integer("12a"),
            Err(ValidationError::OdometerNotInteger)
        );
        assert_eq!(
            optional_non_negative_integer("12.5"),
            Err(ValidationError::OdometerNotInteger)
        );
    }

    #[test]
    fn test_odometer_explicit_plus_sign() {
        assert_eq!(optional_non_negative_integer("+42"), Ok(Some(42)));
    }

    #[test]
    fn test_odometer_beyond_i64_fits_u64() {
        assert_eq!(
            optional_non_negative_integer("10000000000000000000"),
            Ok(Some(10_000_000_000_000_000_000))
        );
    }

    #[test]
    fn test_odometer_huge_negative_is_negative() {
        assert_eq!(
            optional_non_negative_integer("-99999999999999999999"),
            Err(ValidationError::OdometerNegative)
        );
    }

    #[test]
    fn test_odometer_above_u64_max_is_not_storable() {
        assert_eq!(
            optional_non_negative_integer("18446744073709551616"),
            Err(ValidationError::OdometerNotInteger)
        );
        assert_eq!(
            optional_non_negative_integer("18446744073709551615"),
            Ok(Some(u64::MAX))
        );
    }

    #[test]
    fn test_odometer_sign_without_digits() {
        assert_eq!(
            optional_non_negative_integer("-"),
            Err(ValidationError::OdometerNotInteger)
        );
        assert_eq!(
            optional_non_negative_integer("+-1"),
            Err(ValidationError::OdometerNotInteger)
        );
        assert_eq!(optional_non_negative_integer("-0"), Ok(Some(0)));
    }
}
