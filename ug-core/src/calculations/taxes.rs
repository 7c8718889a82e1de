//! German income taxes of a UG and the statutory reserve.
//!
//! | Tax | Base | Rate |
//! |-----|------|------|
//! | Körperschaftsteuer | taxable profit | 15% |
//! | Solidaritätszuschlag | Körperschaftsteuer | 5.5% |
//! | Gewerbesteuer | taxable profit | 3.5% × Hebesatz / 100 |
//!
//! A UG has no Gewerbesteuer allowance (sole proprietors get €24,500).
//! Losses produce no tax and no refund.
//!
//! The UG must also retain 25% of its annual net profit as a statutory
//! reserve (gesetzliche Rücklage, §5a GmbHG) until its capital reaches the
//! €25,000 required to convert into a GmbH.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use ug_core::calculations::taxes::calculate_taxes;
//!
//! let result = calculate_taxes(dec!(100000), 400);
//!
//! assert_eq!(result.koerperschaftsteuer, dec!(15000.00));
//! assert_eq!(result.solidaritaetszuschlag, dec!(825.00));
//! assert_eq!(result.gewerbesteuer, dec!(14000.00));
//! assert_eq!(result.total_taxes, dec!(29825.00));
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::common::round_half_up;

/// Körperschaftsteuer rate.
pub const CORPORATE_TAX_RATE: Decimal = dec!(0.15);

/// Solidaritätszuschlag, applied to the Körperschaftsteuer.
pub const SOLIDARITY_SURCHARGE_RATE: Decimal = dec!(0.055);

/// Steuermesszahl of the Gewerbesteuer.
pub const TRADE_TAX_BASE_RATE: Decimal = dec!(0.035);

/// Share of annual profit a UG must retain.
pub const UG_RESERVE_RATE: Decimal = dec!(0.25);

/// Capital at which the reserve obligation ends.
pub const GMBH_CAPITAL_THRESHOLD: Decimal = dec!(25000);

/// Hebesatz used when a municipality is not in [`HEBESATZ_DATA`].
pub const DEFAULT_HEBESATZ: u32 = 400;

/// Common municipal trade tax multipliers.
pub const HEBESATZ_DATA: &[(&str, u32)] = &[
    ("Berlin", 410),
    ("Hamburg", 470),
    ("München", 490),
    ("Köln", 475),
    ("Frankfurt am Main", 460),
    ("Stuttgart", 420),
    ("Düsseldorf", 440),
    ("Leipzig", 460),
    ("Dortmund", 485),
    ("Essen", 480),
    ("Bremen", 460),
    ("Dresden", 450),
    ("Hannover", 480),
    ("Nürnberg", 447),
    ("Duisburg", 520),
    ("Monheim am Rhein", 250),
    ("Grünwald", 240),
    ("Schönefeld", 300),
];

/// Tax liabilities for one taxable profit figure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResult {
    pub koerperschaftsteuer: Decimal,
    pub solidaritaetszuschlag: Decimal,
    pub gewerbesteuer: Decimal,
    pub total_taxes: Decimal,

    /// Total taxes as a percentage of the taxable profit.
    pub effective_tax_rate: Decimal,
}

/// Computes Körperschaftsteuer, Solidaritätszuschlag and Gewerbesteuer.
///
/// Components are computed unrounded, summed, and then each rounded to the
/// cent. A profit of zero or less yields an all-zero result.
pub fn calculate_taxes(
    taxable_profit: Decimal,
    hebesatz: u32,
) -> TaxResult {
    if taxable_profit <= Decimal::ZERO {
        return TaxResult::default();
    }

    let koerperschaftsteuer = taxable_profit * CORPORATE_TAX_RATE;
    let solidaritaetszuschlag = koerperschaftsteuer * SOLIDARITY_SURCHARGE_RATE;
    let gewerbesteuer =
        taxable_profit * TRADE_TAX_BASE_RATE * (Decimal::from(hebesatz) / Decimal::ONE_HUNDRED);

    let total_taxes = koerperschaftsteuer + solidaritaetszuschlag + gewerbesteuer;
    let effective_tax_rate = total_taxes / taxable_profit * Decimal::ONE_HUNDRED;

    TaxResult {
        koerperschaftsteuer: round_half_up(koerperschaftsteuer),
        solidaritaetszuschlag: round_half_up(solidaritaetszuschlag),
        gewerbesteuer: round_half_up(gewerbesteuer),
        total_taxes: round_half_up(total_taxes),
        effective_tax_rate: round_half_up(effective_tax_rate),
    }
}

/// Tax for a single period's profit, for planning by month or quarter.
pub fn calculate_monthly_tax_estimate(
    monthly_profit: Decimal,
    hebesatz: u32,
) -> TaxResult {
    calculate_taxes(monthly_profit, hebesatz)
}

/// Statutory reserve a UG must retain from `annual_profit`.
///
/// Returns `min(25% of profit, 25,000 - capital)`, or zero when the profit
/// is not positive or the capital already reached 25,000.
///
/// ```
/// use rust_decimal_macros::dec;
/// use ug_core::calculations::taxes::calculate_ug_reserve;
///
/// // 25% would be 50,000 but only 1,000 is missing to reach 25,000.
/// assert_eq!(calculate_ug_reserve(dec!(200000), dec!(24000)), dec!(1000));
/// ```
pub fn calculate_ug_reserve(
    annual_profit: Decimal,
    current_statutory_capital: Decimal,
) -> Decimal {
    if current_statutory_capital >= GMBH_CAPITAL_THRESHOLD {
        return Decimal::ZERO;
    }
    if annual_profit <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let remaining = GMBH_CAPITAL_THRESHOLD - current_statutory_capital;
    let quarter_of_profit = annual_profit * UG_RESERVE_RATE;

    round_half_up(quarter_of_profit.min(remaining))
}

/// Capital after each year's reserve accrual, one entry per profit.
pub fn calculate_cumulative_stammkapital(
    initial_stammkapital: Decimal,
    yearly_profits: &[Decimal],
) -> Vec<Decimal> {
    let mut capital = initial_stammkapital;

    yearly_profits
        .iter()
        .map(|&profit| {
            let reserve = calculate_ug_reserve(profit, capital);
            capital += reserve;
            debug!(profit = %profit, reserve = %reserve, capital = %capital, "Reserve accrued");
            round_half_up(capital)
        })
        .collect()
}

/// Hebesatz of a known municipality, or [`DEFAULT_HEBESATZ`].
pub fn hebesatz_for_city(city: &str) -> u32 {
    HEBESATZ_DATA
        .iter()
        .find(|(name, _)| *name == city)
        .map(|&(_, rate)| rate)
        .unwrap_or(DEFAULT_HEBESATZ)
}
