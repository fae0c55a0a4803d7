//! Money conversion between decimal amounts and integer cents.
//!
//! Prices, wallet balances and sale amounts are `rust_decimal::Decimal` at the
//! API boundary but are stored as integer cents so that SQL can compare and
//! mutate them atomically (`WHERE wallet_balance_cents >= ?`).

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Errors converting a decimal amount to cents.
#[derive(thiserror::Error, Debug, Clone)]
pub enum MoneyError {
    /// Negative amounts are never valid for prices, balances or charges.
    #[error("amount cannot be negative")]
    Negative,
    /// Amounts are limited to two fractional digits.
    #[error("amount cannot have more than two decimal places")]
    TooPrecise,
    /// The amount does not fit in an i64 number of cents.
    #[error("amount out of range")]
    OutOfRange,
}

/// Convert a decimal amount to integer cents.
///
/// # Errors
///
/// Returns [`MoneyError`] if the amount is negative, has more than two
/// fractional digits, or overflows an `i64` cent count.
pub fn decimal_to_cents(amount: Decimal) -> Result<i64, MoneyError> {
    if amount.is_sign_negative() {
        return Err(MoneyError::Negative);
    }

    let scaled = amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or(MoneyError::OutOfRange)?;
    if scaled.fract() != Decimal::ZERO {
        return Err(MoneyError::TooPrecise);
    }

    scaled.to_i64().ok_or(MoneyError::OutOfRange)
}

/// Convert integer cents back to a decimal amount with two fractional digits.
#[must_use]
pub fn cents_to_decimal(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_decimal_to_cents() {
        assert_eq!(decimal_to_cents(dec("499.99")).unwrap(), 49999);
        assert_eq!(decimal_to_cents(dec("100")).unwrap(), 10000);
        assert_eq!(decimal_to_cents(dec("0")).unwrap(), 0);
        assert_eq!(decimal_to_cents(dec("0.5")).unwrap(), 50);
    }

    #[test]
    fn test_negative_rejected() {
        assert!(matches!(
            decimal_to_cents(dec("-1")),
            Err(MoneyError::Negative)
        ));
    }

    #[test]
    fn test_too_precise_rejected() {
        assert!(matches!(
            decimal_to_cents(dec("1.999")),
            Err(MoneyError::TooPrecise)
        ));
    }

    #[test]
    fn test_cents_to_decimal() {
        assert_eq!(cents_to_decimal(49999), dec("499.99"));
        assert_eq!(cents_to_decimal(0), Decimal::ZERO);
    }

    #[test]
    fn test_roundtrip() {
        let amount = dec("123.45");
        assert_eq!(cents_to_decimal(decimal_to_cents(amount).unwrap()), amount);
    }
}
