//! Umsatzsteuer: collected VAT, input VAT (Vorsteuer) and the payable balance.
//!
//! | Term | Meaning |
//! |------|---------|
//! | Collected | VAT charged on sales |
//! | Paid (Vorsteuer) | VAT on purchases, reclaimable |
//! | Payable (Zahllast) | collected − paid, negative means a refund |
//!
//! Not all expenses carry VAT (salaries do not), so input VAT is estimated on
//! [`INPUT_VAT_SHARE`] of the net expenses.
//!
//! Businesses under the Kleinunternehmerregelung (§19 UStG) neither charge
//! nor reclaim VAT.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use ug_core::calculations::vat::{STANDARD_VAT_RATE, calculate_monthly_vat};
//!
//! let result = calculate_monthly_vat(dec!(10000), dec!(2000), false, STANDARD_VAT_RATE);
//!
//! assert_eq!(result.vat_collected, dec!(1900.00));
//! assert_eq!(result.vat_paid, dec!(304.00));
//! assert_eq!(result.vat_payable, dec!(1596.00));
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::calculations::common::{round_half_up, sum};

/// Previous-year revenue limit of the Kleinunternehmerregelung.
pub const SMALL_BUSINESS_THRESHOLD: Decimal = dec!(22000);

/// Expected current-year revenue limit of the Kleinunternehmerregelung.
pub const SMALL_BUSINESS_CURRENT_YEAR_LIMIT: Decimal = dec!(50000);

/// Share of net expenses assumed to carry input VAT.
pub const INPUT_VAT_SHARE: Decimal = dec!(0.8);

pub const STANDARD_VAT_RATE: Decimal = dec!(0.19);

/// Food, books and other reduced-rate goods.
pub const REDUCED_VAT_RATE: Decimal = dec!(0.07);

/// The German rates by name. Every calculation takes the plain rate, so
/// other rates work as well.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VatRate {
    #[default]
    Standard,
    Reduced,
    Exempt,
}

impl VatRate {
    pub fn rate(self) -> Decimal {
        match self {
            VatRate::Standard => STANDARD_VAT_RATE,
            VatRate::Reduced => REDUCED_VAT_RATE,
            VatRate::Exempt => Decimal::ZERO,
        }
    }
}

impl From<VatRate> for Decimal {
    fn from(rate: VatRate) -> Self {
        rate.rate()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VatResult {
    pub vat_collected: Decimal,
    pub vat_paid: Decimal,
    pub vat_payable: Decimal,
    pub net_revenue: Decimal,
    pub gross_revenue: Decimal,
}

/// One month's net figures, as fed into [`calculate_annual_vat`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyVatBase {
    pub net_revenue: Decimal,
    pub net_expenses: Decimal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnualVat {
    pub total_vat_collected: Decimal,
    pub total_vat_paid: Decimal,
    pub total_vat_payable: Decimal,

    /// Payable VAT per calendar quarter (Umsatzsteuer-Voranmeldung).
    pub quarterly_payments: [Decimal; 4],
}

pub fn net_from_gross(
    gross: Decimal,
    rate: Decimal,
) -> Decimal {
    round_half_up(gross / (Decimal::ONE + rate))
}

pub fn gross_from_net(
    net: Decimal,
    rate: Decimal,
) -> Decimal {
    round_half_up(net * (Decimal::ONE + rate))
}

pub fn vat_from_net(
    net: Decimal,
    rate: Decimal,
) -> Decimal {
    round_half_up(net * rate)
}

/// VAT contained in a gross amount, as the difference to its rounded net.
pub fn vat_from_gross(
    gross: Decimal,
    rate: Decimal,
) -> Decimal {
    round_half_up(gross - net_from_gross(gross, rate))
}

/// VAT position for one month.
///
/// The payable amount may be negative when input VAT exceeds collected VAT.
pub fn calculate_monthly_vat(
    net_revenue: Decimal,
    net_expenses: Decimal,
    is_small_business: bool,
    rate: Decimal,
) -> VatResult {
    if is_small_business {
        return VatResult {
            net_revenue,
            gross_revenue: net_revenue,
            ..VatResult::default()
        };
    }

    let vat_collected = vat_from_net(net_revenue, rate);
    let vat_paid = vat_from_net(net_expenses * INPUT_VAT_SHARE, rate);

    VatResult {
        vat_collected,
        vat_paid,
        vat_payable: round_half_up(vat_collected - vat_paid),
        net_revenue,
        gross_revenue: gross_from_net(net_revenue, rate),
    }
}

/// Whether the Kleinunternehmerregelung applies.
///
/// Both limits are inclusive.
pub fn check_small_business_status(
    previous_year_revenue: Decimal,
    current_year_expected_revenue: Decimal,
) -> bool {
    previous_year_revenue <= SMALL_BUSINESS_THRESHOLD
        && current_year_expected_revenue <= SMALL_BUSINESS_CURRENT_YEAR_LIMIT
}

/// Sum of the monthly payables of one filing period.
pub fn calculate_quarterly_vat(monthly_payables: &[Decimal]) -> Decimal {
    round_half_up(sum(monthly_payables.iter().copied()))
}

/// Annual VAT totals and quarterly prepayments.
///
/// `months` holds the calendar year in order, January first. Quarters past
/// the supplied months are zero; months beyond the twelfth are counted in
/// the totals only.
pub fn calculate_annual_vat(
    months: &[MonthlyVatBase],
    is_small_business: bool,
    rate: Decimal,
) -> AnnualVat {
    if is_small_business {
        return AnnualVat::default();
    }

    let results: Vec<VatResult> = months
        .iter()
        .map(|m| calculate_monthly_vat(m.net_revenue, m.net_expenses, false, rate))
        .collect();

    let total_vat_collected = sum(results.iter().map(|r| r.vat_collected));
    let total_vat_paid = sum(results.iter().map(|r| r.vat_paid));

    let mut quarterly_payments = [Decimal::ZERO; 4];
    for (quarter, chunk) in results.chunks(3).take(4).enumerate() {
        let payables: Vec<Decimal> = chunk.iter().map(|r| r.vat_payable).collect();
        quarterly_payments[quarter] = calculate_quarterly_vat(&payables);
    }

    AnnualVat {
        total_vat_collected: round_half_up(total_vat_collected),
        total_vat_paid: round_half_up(total_vat_paid),
        total_vat_payable: round_half_up(total_vat_collected - total_vat_paid),
        quarterly_payments,
    }
}
