//! JPY → MMK conversion and kyat display helpers.

use rust_decimal::{prelude::ToPrimitive, Decimal, RoundingStrategy};
use thiserror::Error;

use crate::domain::Currency;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("{amount} JPY at rate {rate} does not fit a kyat amount")]
    Overflow { amount: i64, rate: Decimal },
}

/// Converts `amount` in `currency` to kyat using the month's exchange rate.
///
/// MMK passes through unchanged. JPY is multiplied by `exchange_rate` and rounded half
/// up to the nearest kyat. The caller guarantees a non-negative amount and a strictly
/// positive rate. The same inputs always produce the same output, so re-running a rate
/// cascade with an unchanged rate leaves every donation as it was.
pub fn to_kyat(
    amount: i64,
    currency: Currency,
    exchange_rate: Decimal,
) -> Result<i64, ConversionError> {
    match currency {
        Currency::Mmk => Ok(amount),
        Currency::Jpy => Decimal::from(amount)
            .checked_mul(exchange_rate)
            .map(|product| {
                product.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            })
            .and_then(|rounded| rounded.to_i64())
            .ok_or(ConversionError::Overflow {
                amount,
                rate: exchange_rate,
            }),
    }
}

/// Renders a kyat amount with thousands grouping, e.g. `-1,234,567 MMK`.
pub fn format_kyat(value: i128) -> String {
    let digits = value.unsigned_abs().to_string();
    let grouped = group_digits(&digits, ',');
    if value < 0 {
        format!("-{grouped} MMK")
    } else {
        format!("{grouped} MMK")
    }
}

/// Renders a boundary money string (see [`crate::core::views`]) for display. Strings that
/// are not integers are returned as-is.
pub fn format_kyat_str(value: &str) -> String {
    value
        .parse::<i128>()
        .map(format_kyat)
        .unwrap_or_else(|_| value.to_string())
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate(raw: &str) -> Decimal {
        raw.parse().unwrap()
    }

    #[test]
    fn mmk_passes_through() {
        assert_eq!(to_kyat(12_345, Currency::Mmk, rate("31.7")), Ok(12_345));
    }

    #[test]
    fn jpy_multiplies_by_rate() {
        assert_eq!(to_kyat(1000, Currency::Jpy, rate("35")), Ok(35_000));
    }

    #[test]
    fn jpy_rounds_half_up() {
        assert_eq!(to_kyat(1, Currency::Jpy, rate("14.5")), Ok(15));
        assert_eq!(to_kyat(1, Currency::Jpy, rate("14.49")), Ok(14));
        assert_eq!(to_kyat(3, Currency::Jpy, rate("0.5")), Ok(2));
    }

    #[test]
    fn conversion_is_deterministic() {
        let first = to_kyat(777, Currency::Jpy, rate("28.123"));
        let second = to_kyat(777, Currency::Jpy, rate("28.123"));
        assert_eq!(first, second);
        assert_eq!(first, Ok(21_852));
    }

    #[test]
    fn oversized_products_are_rejected() {
        let err = to_kyat(i64::MAX, Currency::Jpy, rate("1000")).unwrap_err();
        assert!(matches!(err, ConversionError::Overflow { .. }));
    }

    #[test]
    fn formats_grouped_kyat() {
        assert_eq!(format_kyat(0), "0 MMK");
        assert_eq!(format_kyat(200_000), "200,000 MMK");
        assert_eq!(format_kyat(-1_234_567), "-1,234,567 MMK");
        assert_eq!(format_kyat_str("300000"), "300,000 MMK");
    }
}
