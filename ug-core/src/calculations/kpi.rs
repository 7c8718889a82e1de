//! Headline figures derived from a finished liquidity plan.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::calculations::common::{MONTHS_PER_YEAR, round_half_up, sum};
use crate::calculations::taxes::GMBH_CAPITAL_THRESHOLD;
use crate::models::{LiquidityResult, MonthKey, YearSummary};

/// A month that closes with a negative balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityWarning {
    pub month: MonthKey,
    pub balance: Decimal,
}

/// How long the cash lasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "month", rename_all = "snake_case")]
pub enum Runway {
    /// The balance stays non-negative for the whole plan.
    Beyond,
    /// First month whose end balance is negative.
    NegativeAt(MonthKey),
}

/// All months with a negative end balance, in month order.
pub fn check_liquidity_warnings(result: &LiquidityResult) -> Vec<LiquidityWarning> {
    let warnings: Vec<LiquidityWarning> = result
        .months
        .values()
        .filter(|calc| calc.end_balance < Decimal::ZERO)
        .map(|calc| LiquidityWarning {
            month: calc.month,
            balance: calc.end_balance,
        })
        .collect();

    if let Some(first) = warnings.first() {
        warn!(
            month = %first.month,
            balance = %first.balance,
            count = warnings.len(),
            "Liquidity turns negative"
        );
    }
    warnings
}

/// First month whose operating result is non-negative after a negative one.
///
/// The month before the plan counts as negative, so a plan profitable from
/// its first month breaks even in that month.
pub fn find_break_even_month(result: &LiquidityResult) -> Option<MonthKey> {
    let mut previous_negative = true;

    for calc in result.months.values() {
        let operating_result = calc.operating_result();
        if previous_negative && operating_result >= Decimal::ZERO {
            return Some(calc.month);
        }
        previous_negative = operating_result < Decimal::ZERO;
    }

    None
}

pub fn calculate_runway(result: &LiquidityResult) -> Runway {
    result
        .months
        .values()
        .find(|calc| calc.end_balance < Decimal::ZERO)
        .map_or(Runway::Beyond, |calc| Runway::NegativeAt(calc.month))
}

/// Average monthly shortfall of costs over revenue in a year, never negative.
pub fn calculate_burn_rate(summary: &YearSummary) -> Decimal {
    let burn = (summary.total_costs - summary.total_revenue) / MONTHS_PER_YEAR;
    round_half_up(burn.max(Decimal::ZERO))
}

/// Revenue growth from `first` to `last` in whole percent.
///
/// Growth from zero counts as 100% when revenue appears, else 0%.
pub fn calculate_revenue_growth(
    first: Decimal,
    last: Decimal,
) -> Decimal {
    if first.is_zero() {
        return if last > Decimal::ZERO {
            Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        };
    }

    ((last - first) / first.abs() * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Net profit as a share of revenue in whole percent, 0 without revenue.
pub fn calculate_profit_margin(summary: &YearSummary) -> Decimal {
    if summary.total_revenue.is_zero() {
        return Decimal::ZERO;
    }

    (summary.net_profit / summary.total_revenue * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Taxes over all plan years.
pub fn total_taxes(result: &LiquidityResult) -> Decimal {
    sum(result.year_summaries.values().map(|s| s.total_taxes))
}

/// Reserves accrued over all plan years.
pub fn total_ug_reserve(result: &LiquidityResult) -> Decimal {
    sum(result.year_summaries.values().map(|s| s.ug_reserve))
}

/// Share of the 25,000 GmbH capital covered by accrued reserves, in percent
/// with one decimal place, capped at 100.
pub fn reserve_progress(result: &LiquidityResult) -> Decimal {
    let progress = total_ug_reserve(result) / GMBH_CAPITAL_THRESHOLD * Decimal::ONE_HUNDRED;
    progress
        .min(Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

/// The dashboard figures of a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanKpis {
    /// Growth from the first to the last plan year, whole percent.
    pub revenue_growth: Decimal,
    pub break_even_month: Option<MonthKey>,
    pub runway: Runway,
    /// Monthly burn in the first plan year.
    pub burn_rate: Decimal,
    /// Net margin of the last plan year, whole percent.
    pub profit_margin: Decimal,
    pub total_taxes: Decimal,
    pub total_ug_reserve: Decimal,
    pub reserve_progress: Decimal,
    pub liquidity_warnings: Vec<LiquidityWarning>,
}

impl PlanKpis {
    pub fn from_result(result: &LiquidityResult) -> Self {
        let first_year = result.year_summaries.values().next();
        let last_year = result.year_summaries.values().next_back();
        let revenue_of = |s: Option<&YearSummary>| s.map(|s| s.total_revenue).unwrap_or_default();

        Self {
            revenue_growth: calculate_revenue_growth(revenue_of(first_year), revenue_of(last_year)),
            break_even_month: find_break_even_month(result),
            runway: calculate_runway(result),
            burn_rate: first_year.map(calculate_burn_rate).unwrap_or_default(),
            profit_margin: last_year.map(calculate_profit_margin).unwrap_or_default(),
            total_taxes: total_taxes(result),
            total_ug_reserve: total_ug_reserve(result),
            reserve_progress: reserve_progress(result),
            liquidity_warnings: check_liquidity_warnings(result),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::calculations::liquidity::calculate_liquidity;
    use crate::models::{Employee, OperatingCosts, PlanBuilder, RevenuePlan};

    fn month(s: &str) -> MonthKey {
        s.parse().unwrap()
    }

    /// Revenue ramps from 0 to 7,000 against 4,000 fixed costs.
    fn ramp_plan(starting_liquidity: Decimal) -> LiquidityResult {
        let input = PlanBuilder::new()
            .start_year(2026)
            .starting_liquidity(starting_liquidity)
            .revenue(RevenuePlan::Growth {
                start: Decimal::ZERO,
                end: dec!(7000),
            })
            .operating_costs(OperatingCosts::default())
            .employee(Employee {
                role: "Geschäftsführer".to_string(),
                monthly_salary: dec!(4000),
                start_month: month("2026-01"),
                end_month: None,
                is_managing_director: true,
            })
            .build();
        calculate_liquidity(&input)
    }

    fn summary(
        revenue: Decimal,
        costs: Decimal,
    ) -> YearSummary {
        YearSummary {
            year: 2026,
            total_revenue: revenue,
            total_costs: costs,
            ..YearSummary::default()
        }
    }

    // =========================================================================
    // liquidity warning / runway tests
    // =========================================================================

    #[test]
    fn warnings_list_every_negative_month() {
        let result = ramp_plan(dec!(10000));

        let warnings = check_liquidity_warnings(&result);

        assert!(!warnings.is_empty());
        assert!(warnings.iter().all(|w| w.balance < Decimal::ZERO));
        assert!(warnings.windows(2).all(|w| w[0].month < w[1].month));
    }

    #[test]
    fn runway_points_at_first_negative_month() {
        let result = ramp_plan(dec!(10000));

        let runway = calculate_runway(&result);

        let first_warning = check_liquidity_warnings(&result)[0].month;
        assert_eq!(runway, Runway::NegativeAt(first_warning));
    }

    #[test]
    fn runway_beyond_plan_with_enough_cash() {
        let result = ramp_plan(dec!(100000));

        assert_eq!(calculate_runway(&result), Runway::Beyond);
        assert!(check_liquidity_warnings(&result).is_empty());
    }

    // =========================================================================
    // break-even tests
    // =========================================================================

    #[test]
    fn break_even_when_revenue_covers_costs() {
        let result = ramp_plan(dec!(100000));

        // 7000 * i / 35 >= 4000 from i = 20
        assert_eq!(find_break_even_month(&result), Some(month("2027-09")));
    }

    #[test]
    fn profitable_first_month_breaks_even_immediately() {
        let input = PlanBuilder::new()
            .start_year(2026)
            .revenue(RevenuePlan::Fixed {
                monthly: dec!(5000),
            })
            .build();

        let result = calculate_liquidity(&input);

        assert_eq!(find_break_even_month(&result), Some(month("2026-01")));
    }

    #[test]
    fn no_break_even_without_revenue() {
        let input = PlanBuilder::new().start_year(2026).build();

        assert_eq!(find_break_even_month(&calculate_liquidity(&input)), None);
    }

    // =========================================================================
    // burn rate / growth / margin tests
    // =========================================================================

    #[test]
    fn burn_rate_is_monthly_shortfall() {
        assert_eq!(calculate_burn_rate(&summary(dec!(12000), dec!(48000))), dec!(3000));
    }

    #[test]
    fn burn_rate_is_zero_when_profitable() {
        assert_eq!(calculate_burn_rate(&summary(dec!(60000), dec!(48000))), Decimal::ZERO);
    }

    #[test]
    fn revenue_growth_in_whole_percent() {
        assert_eq!(calculate_revenue_growth(dec!(30000), dec!(75000)), dec!(150));
        assert_eq!(calculate_revenue_growth(dec!(30000), dec!(20000)), dec!(-33));
    }

    #[test]
    fn revenue_growth_from_zero() {
        assert_eq!(calculate_revenue_growth(Decimal::ZERO, dec!(1)), dec!(100));
        assert_eq!(calculate_revenue_growth(Decimal::ZERO, Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn profit_margin_in_whole_percent() {
        let year = YearSummary {
            net_profit: dec!(9263.10),
            ..summary(dec!(60000), dec!(46800))
        };

        // 9263.10 / 60000 = 15.44 %
        assert_eq!(calculate_profit_margin(&year), dec!(15));
    }

    #[test]
    fn profit_margin_without_revenue_is_zero() {
        let year = YearSummary {
            net_profit: dec!(-4800),
            ..summary(Decimal::ZERO, dec!(4800))
        };

        assert_eq!(calculate_profit_margin(&year), Decimal::ZERO);
    }

    #[test]
    fn total_taxes_add_up_all_years() {
        let input = PlanBuilder::new()
            .start_year(2026)
            .revenue(RevenuePlan::Fixed {
                monthly: dec!(5000),
            })
            .employee(Employee {
                role: "Geschäftsführer".to_string(),
                monthly_salary: dec!(3000),
                start_month: month("2026-01"),
                end_month: None,
                is_managing_director: true,
            })
            .build();

        let result = calculate_liquidity(&input);

        // 13200 profit per year, 3936.90 taxes each
        assert_eq!(total_taxes(&result), dec!(11810.70));
        assert_eq!(PlanKpis::from_result(&result).profit_margin, dec!(15));
    }

    #[test]
    fn plan_without_revenue_has_zero_margin_and_taxes() {
        let input = PlanBuilder::new().start_year(2026).build();

        let kpis = PlanKpis::from_result(&calculate_liquidity(&input));

        assert_eq!(kpis.profit_margin, Decimal::ZERO);
        assert_eq!(kpis.total_taxes, Decimal::ZERO);
    }

    // =========================================================================
    // reserve progress / PlanKpis tests
    // =========================================================================

    #[test]
    fn reserve_progress_is_capped_at_hundred() {
        let input = PlanBuilder::new()
            .start_year(2026)
            .revenue(RevenuePlan::Fixed {
                monthly: dec!(50000),
            })
            .build();

        let result = calculate_liquidity(&input);

        assert_eq!(reserve_progress(&result), dec!(100));
    }

    #[test]
    fn reserve_progress_of_empty_plan_is_zero() {
        assert_eq!(reserve_progress(&LiquidityResult::default()), Decimal::ZERO);
    }

    #[test]
    fn kpis_bundle_all_figures() {
        let result = ramp_plan(dec!(10000));

        let kpis = PlanKpis::from_result(&result);

        assert_eq!(kpis.break_even_month, Some(month("2027-09")));
        assert_eq!(kpis.runway, calculate_runway(&result));
        assert_eq!(kpis.burn_rate, calculate_burn_rate(&result.year_summaries[&2026]));
        assert!(kpis.revenue_growth > Decimal::ZERO);
        assert_eq!(kpis.liquidity_warnings.len(), check_liquidity_warnings(&result).len());
    }
}
