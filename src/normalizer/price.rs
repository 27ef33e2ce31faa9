//! Localized price strings to integer amounts.
//!
//! Amounts are whole currency units. A fractional part is truncated, not
//! rounded: `"₱1,999.99"` becomes `1999`.

use thiserror::Error;

/// Currency markers stripped before parsing. `"â‚±"` is a peso sign that
/// went through a latin-1 round trip; some themes serve it that way.
const CURRENCY_MARKERS: &[&str] = &["â‚±", "php", "₱", "$", "€", "£", "¥"];

const RANGE_SEPARATORS: &[&str] = &["–", "—", " - ", " to "];

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PriceError {
    #[error("no digits in price \"{0}\"")]
    NoDigits(String),

    #[error("price \"{0}\" is not a plain amount")]
    Invalid(String),

    #[error("price \"{0}\" is out of range")]
    Overflow(String),
}

/// Parse one localized amount such as `"₱ 12,345.00"`.
pub fn normalize_price(raw: &str) -> Result<i64, PriceError> {
    if !raw.chars().any(|c| c.is_ascii_digit()) {
        return Err(PriceError::NoDigits(raw.to_string()));
    }

    let mut cleaned = raw.to_lowercase();
    for marker in CURRENCY_MARKERS {
        cleaned = cleaned.replace(marker, "");
    }
    let cleaned: String = cleaned
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect();

    // Truncate the fractional part.
    let whole = cleaned.split('.').next().unwrap_or_default();
    if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
        return Err(PriceError::Invalid(raw.to_string()));
    }

    whole
        .parse::<i64>()
        .map_err(|_| PriceError::Overflow(raw.to_string()))
}

/// Parse a price that may be a range (`"₱20,000 – ₱22,000"`) into its bounds,
/// in the order they appear. A plain amount yields a single bound.
pub fn parse_price_range(raw: &str) -> Result<Vec<i64>, PriceError> {
    let mut unified = raw.to_string();
    for sep in RANGE_SEPARATORS {
        unified = unified.replace(sep, "\u{1f}");
    }

    unified
        .split('\u{1f}')
        .filter(|part| !part.trim().is_empty())
        .map(normalize_price)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peso_with_separators_and_decimals() {
        assert_eq!(normalize_price("₱ 12,345.00"), Ok(12345));
    }

    #[test]
    fn test_plain_thousands() {
        assert_eq!(normalize_price("1,000"), Ok(1000));
    }

    #[test]
    fn test_multiple_separators() {
        assert_eq!(normalize_price("₱1,234,567"), Ok(1_234_567));
    }

    #[test]
    fn test_fraction_is_truncated_not_rounded() {
        assert_eq!(normalize_price("₱1,999.99"), Ok(1999));
    }

    #[test]
    fn test_other_currency_markers() {
        assert_eq!(normalize_price("PHP 25,990"), Ok(25990));
        assert_eq!(normalize_price("â‚±8,500.00"), Ok(8500));
        assert_eq!(normalize_price("$499"), Ok(499));
        assert_eq!(normalize_price("\u{a0}₱\u{a0}3,200"), Ok(3200));
    }

    #[test]
    fn test_garbage_is_error_not_zero() {
        assert_eq!(
            normalize_price("Call for price"),
            Err(PriceError::NoDigits("Call for price".into()))
        );
        assert_eq!(normalize_price(""), Err(PriceError::NoDigits("".into())));
    }

    #[test]
    fn test_mixed_text_is_invalid() {
        assert_eq!(
            normalize_price("12k only"),
            Err(PriceError::Invalid("12k only".into()))
        );
        assert_eq!(normalize_price(".50"), Err(PriceError::Invalid(".50".into())));
    }

    #[test]
    fn test_overflow() {
        assert!(matches!(
            normalize_price("99999999999999999999"),
            Err(PriceError::Overflow(_))
        ));
    }

    #[test]
    fn test_range_bounds_in_order() {
        assert_eq!(
            parse_price_range("₱20,000 – ₱22,000"),
            Ok(vec![20000, 22000])
        );
        assert_eq!(parse_price_range("₱20,000—₱22,000"), Ok(vec![20000, 22000]));
        assert_eq!(parse_price_range("20,000 - 22,000"), Ok(vec![20000, 22000]));
    }

    #[test]
    fn test_range_of_single_amount() {
        assert_eq!(parse_price_range("₱18,995.00"), Ok(vec![18995]));
    }

    #[test]
    fn test_range_with_bad_bound_fails() {
        assert!(parse_price_range("₱20,000 – TBA").is_err());
    }
}
