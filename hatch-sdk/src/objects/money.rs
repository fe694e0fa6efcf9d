//! Conversion of Stripe minor-unit amounts.

use rust_decimal::Decimal;

/// Currencies Stripe bills without a minor unit.
const ZERO_DECIMAL_CURRENCIES: &[&str] = &[
    "bif", "clp", "djf", "gnf", "jpy", "kmf", "krw", "mga", "pyg", "rwf", "ugx", "vnd", "vuv",
    "xaf", "xof", "xpf",
];

/// Convert a Stripe amount in minor units (cents) into major units.
///
/// `minor_to_major(4900, "usd")` is `49.00`; `minor_to_major(500, "jpy")` is `500`.
pub fn minor_to_major(amount: i64, currency: &str) -> Decimal {
    let scale = if ZERO_DECIMAL_CURRENCIES
        .iter()
        .any(|c| c.eq_ignore_ascii_case(currency))
    {
        0
    } else {
        2
    };
    Decimal::new(amount, scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_decimal_currency() {
        assert_eq!(minor_to_major(4900, "usd").to_string(), "49.00");
        assert_eq!(minor_to_major(1999, "EUR").to_string(), "19.99");
    }

    #[test]
    fn test_zero_decimal_currency() {
        assert_eq!(minor_to_major(500, "JPY").to_string(), "500");
    }
}
