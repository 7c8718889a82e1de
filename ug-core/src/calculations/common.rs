//! Common utility functions for plan calculations.
//!
//! This module provides shared functionality used across the tax, loan, VAT
//! and liquidity calculations, including cent rounding and compounding.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Number of months in a calendar year, as a decimal divisor.
pub const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero, matching the cent
/// rounding banks apply to statements.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use ug_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Expresses `value` as a percentage of `base` with one decimal place.
///
/// Computed as `round(value / base * 1000) / 10`. Returns zero when `base`
/// is zero instead of dividing.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use ug_core::calculations::common::percent_of;
///
/// assert_eq!(percent_of(dec!(333.33), dec!(1000)), dec!(33.3));
/// assert_eq!(percent_of(dec!(50), dec!(0)), dec!(0));
/// ```
pub fn percent_of(
    value: Decimal,
    base: Decimal,
) -> Decimal {
    if base.is_zero() {
        return Decimal::ZERO;
    }

    let permille = (value / base * Decimal::ONE_THOUSAND)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    (permille / Decimal::TEN).normalize()
}

/// Raises `1 + rate` to the power `periods` by repeated multiplication.
///
/// Keeps full decimal precision. Returns `None` once the factor no longer
/// fits a `Decimal`.
pub fn compound_factor(
    rate: Decimal,
    periods: u32,
) -> Option<Decimal> {
    let base = Decimal::ONE + rate;
    (0..periods).try_fold(Decimal::ONE, |acc, _| acc.checked_mul(base))
}

/// Sums an iterator of decimals.
pub fn sum<I>(values: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    values.into_iter().fold(Decimal::ZERO, |acc, v| acc + v)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    // =========================================================================
    // round_half_up tests
    // =========================================================================

    #[test]
    fn round_half_up_rounds_down_below_midpoint() {
        let result = round_half_up(dec!(123.454));

        assert_eq!(result, dec!(123.45));
    }

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        let result = round_half_up(dec!(0.125));

        assert_eq!(result, dec!(0.13));
    }

    #[test]
    fn round_half_up_handles_negative_values() {
        let result = round_half_up(dec!(-123.455));

        assert_eq!(result, dec!(-123.46));
    }

    #[test]
    fn round_half_up_handles_long_fractions() {
        let result = round_half_up(dec!(1) / dec!(3));

        assert_eq!(result, dec!(0.33));
    }

    // =========================================================================
    // percent_of tests
    // =========================================================================

    #[test]
    fn percent_of_uses_one_decimal_place() {
        let result = percent_of(dec!(1234), dec!(10000));

        assert_eq!(result, dec!(12.3));
    }

    #[test]
    fn percent_of_rounds_half_up_on_permille() {
        // 0.12345 * 1000 = 123.45 -> 123 -> 12.3
        assert_eq!(percent_of(dec!(12.345), dec!(100)), dec!(12.3));
        // 0.12355 * 1000 = 123.55 -> 124 -> 12.4
        assert_eq!(percent_of(dec!(12.355), dec!(100)), dec!(12.4));
    }

    #[test]
    fn percent_of_full_base_is_hundred() {
        let result = percent_of(dec!(4711.00), dec!(4711.00));

        assert_eq!(result, dec!(100));
    }

    #[test]
    fn percent_of_zero_base_is_zero() {
        let result = percent_of(dec!(-500), Decimal::ZERO);

        assert_eq!(result, Decimal::ZERO);
    }

    #[test]
    fn percent_of_negative_value() {
        let result = percent_of(dec!(-250), dec!(1000));

        assert_eq!(result, dec!(-25));
    }

    // =========================================================================
    // compound_factor / sum tests
    // =========================================================================

    #[test]
    fn compound_factor_zero_periods_is_one() {
        assert_eq!(compound_factor(dec!(0.05), 0), Some(Decimal::ONE));
    }

    #[test]
    fn compound_factor_multiplies_periods() {
        assert_eq!(compound_factor(dec!(0.10), 2), Some(dec!(1.21)));
    }

    #[test]
    fn compound_factor_overflow_is_none() {
        // 2^100 is beyond Decimal::MAX
        assert_eq!(compound_factor(Decimal::ONE, 100), None);
        assert!(compound_factor(Decimal::ONE, 90).is_some());
    }

    #[test]
    fn sum_adds_all_values() {
        let result = sum([dec!(1.10), dec!(2.20), dec!(3.30)]);

        assert_eq!(result, dec!(6.60));
    }

    #[test]
    fn sum_of_nothing_is_zero() {
        assert_eq!(sum(Vec::<Decimal>::new()), Decimal::ZERO);
    }
}
