//! Money helpers with decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All amounts are `rust_decimal::Decimal` and are rounded to two decimal
//! places at the point of computation, not at display time.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places carried by every money amount.
pub const MONEY_DP: u32 = 2;

/// Rounds a money amount to two decimal places using half-up rounding.
///
/// Half-up (midpoint away from zero) is applied at every computation point
/// so repeated partial operations cannot drift.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Computes `rate` percent of `amount`, rounded to two decimal places.
#[must_use]
pub fn percent_of(amount: Decimal, rate: Decimal) -> Decimal {
    round_money(amount * rate / Decimal::ONE_HUNDRED)
}

/// Formats a money amount with exactly two decimal places for the wire.
///
/// Money values are serialized as decimal strings to avoid floating-point
/// precision loss at the API boundary.
#[must_use]
pub fn format_money(amount: Decimal) -> String {
    format!("{:.2}", round_money(amount))
}

/// Parses a money amount from an API request string.
///
/// Returns `None` for malformed input; range checks are the caller's job.
#[must_use]
pub fn parse_money(input: &str) -> Option<Decimal> {
    input.trim().parse::<Decimal>().ok().map(round_money)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_money_half_up() {
        assert_eq!(round_money(dec!(1.005)), dec!(1.01));
        assert_eq!(round_money(dec!(1.004)), dec!(1.00));
        assert_eq!(round_money(dec!(2.675)), dec!(2.68));
    }

    #[test]
    fn test_round_money_noop_on_two_places() {
        assert_eq!(round_money(dec!(84.80)), dec!(84.80));
    }

    #[test]
    fn test_percent_of() {
        // 5% of 80 = 4.00
        assert_eq!(percent_of(dec!(80), dec!(5)), dec!(4.00));
        // 20% of 100 = 20.00
        assert_eq!(percent_of(dec!(100), dec!(20)), dec!(20.00));
        // 1% of 33.33 = 0.3333 -> 0.33
        assert_eq!(percent_of(dec!(33.33), dec!(1)), dec!(0.33));
    }

    #[test]
    fn test_format_money_fixed_two_places() {
        assert_eq!(format_money(dec!(84)), "84.00");
        assert_eq!(format_money(dec!(84.8)), "84.80");
        assert_eq!(format_money(dec!(0)), "0.00");
    }

    #[test]
    fn test_parse_money() {
        assert_eq!(parse_money("42.40"), Some(dec!(42.40)));
        assert_eq!(parse_money(" 100 "), Some(dec!(100)));
        assert_eq!(parse_money("1.005"), Some(dec!(1.01)));
        assert_eq!(parse_money("abc"), None);
        assert_eq!(parse_money(""), None);
    }

    #[test]
    fn test_parse_money_negative_passes_through() {
        // Sign validation happens in the domain layer, not here.
        assert_eq!(parse_money("-5"), Some(dec!(-5)));
    }
}
