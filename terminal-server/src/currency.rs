//! Per-currency amount bounds
//!
//! Minimums follow the processor's minimum charge amounts; charging below
//! them fails at the processor, so the guard rejects early with a message
//! naming the currency and its minimum.

use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};

/// Per-transaction maximum, any currency (999,999.99)
pub fn max_amount() -> Decimal {
    Decimal::new(99_999_999, 2)
}

/// Fallback minimum for currencies not in the table (0.50)
pub fn default_minimum() -> Decimal {
    Decimal::new(50, 2)
}

/// Minimum chargeable amount for an ISO currency code (major units)
pub fn minimum_amount(currency: &str) -> Decimal {
    match currency.to_ascii_lowercase().as_str() {
        "usd" | "eur" | "cad" | "aud" | "chf" => Decimal::new(50, 2),
        "gbp" => Decimal::new(30, 2),
        "jpy" | "inr" | "kes" => Decimal::new(50, 0),
        "cny" => Decimal::new(3, 0),
        "mxn" => Decimal::new(10, 0),
        "brl" => Decimal::new(2, 0),
        "zar" => Decimal::new(8, 0),
        "ngn" => Decimal::new(500, 0),
        "ghs" => Decimal::new(5, 0),
        _ => default_minimum(),
    }
}

/// Display symbol used in validation messages
pub fn symbol(currency: &str) -> &'static str {
    match currency.to_ascii_lowercase().as_str() {
        "usd" | "mxn" => "$",
        "eur" => "€",
        "gbp" => "£",
        "ngn" => "₦",
        "inr" => "₹",
        "jpy" | "cny" => "¥",
        "cad" => "C$",
        "aud" => "A$",
        "brl" => "R$",
        "zar" => "R",
        "kes" => "KSh",
        "ghs" => "₵",
        "chf" => "Fr",
        _ => "",
    }
}

/// Validate a charge amount against the currency's bounds.
///
/// Runs before the quota guard and before any processor call; a rejection
/// here leaves every counter untouched.
pub fn validate_amount(amount: Decimal, currency: &str) -> Result<(), AppError> {
    if amount.is_sign_negative() || amount.is_zero() {
        return Err(AppError::with_message(
            ErrorCode::InvalidFormat,
            "Invalid amount format",
        ));
    }

    let min = minimum_amount(currency);
    if amount < min {
        return Err(AppError::with_message(
            ErrorCode::AmountBelowMinimum,
            format!(
                "Minimum transaction amount for {} is {}{}",
                currency.to_uppercase(),
                symbol(currency),
                min
            ),
        )
        .with_detail("currency", currency.to_uppercase())
        .with_detail("minimum", min.to_string()));
    }

    if amount > max_amount() {
        return Err(AppError::with_message(
            ErrorCode::AmountAboveMaximum,
            format!("Maximum transaction amount is {}", max_amount()),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_below_minimum_rejected_with_symbol() {
        let err = validate_amount(dec("100"), "ngn").unwrap_err();
        assert_eq!(err.code, ErrorCode::AmountBelowMinimum);
        assert_eq!(err.message, "Minimum transaction amount for NGN is ₦500");
    }

    #[test]
    fn test_minimum_is_inclusive() {
        assert!(validate_amount(dec("0.50"), "usd").is_ok());
        assert!(validate_amount(dec("0.49"), "usd").is_err());
        assert!(validate_amount(dec("0.30"), "gbp").is_ok());
    }

    #[test]
    fn test_unknown_currency_uses_default_minimum() {
        assert!(validate_amount(dec("0.50"), "xyz").is_ok());
        let err = validate_amount(dec("0.10"), "xyz").unwrap_err();
        assert_eq!(err.code, ErrorCode::AmountBelowMinimum);
    }

    #[test]
    fn test_above_maximum_rejected() {
        let err = validate_amount(dec("1000000"), "usd").unwrap_err();
        assert_eq!(err.code, ErrorCode::AmountAboveMaximum);
    }

    #[test]
    fn test_zero_and_negative_rejected() {
        assert_eq!(
            validate_amount(dec("0"), "usd").unwrap_err().code,
            ErrorCode::InvalidFormat
        );
        assert_eq!(
            validate_amount(dec("-5"), "usd").unwrap_err().code,
            ErrorCode::InvalidFormat
        );
    }
}
