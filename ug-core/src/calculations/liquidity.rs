//! The 36-month liquidity plan.
//!
//! A single forward pass over the plan window produces one
//! [`MonthlyCalculation`] per month, followed by a rollup into one
//! [`YearSummary`] per calendar year.
//!
//! # Monthly Flow
//!
//! | Step | Value |
//! |------|-------|
//! | Inflows | revenue (other income is always 0) |
//! | Outflows | personnel + operating costs + investments + loan payments |
//! | Net cash flow | inflows − outflows |
//! | End balance | start balance + net cash flow |
//!
//! Loan principal is a cash outflow but not an expense: taxable profit counts
//! loan interest only.
//!
//! # Tax Accrual
//!
//! Monthly tax figures are estimates. The year-to-date profit is annualized
//! (`ytd_profit / month_of_year × 12`), taxed, and one twelfth of each tax
//! component is recorded. The exact annual taxes are computed once per year
//! in the rollup.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::calculations::common::{MONTHS_PER_YEAR, round_half_up, sum};
use crate::calculations::loans::{
    MonthlyLoanCosts, calculate_monthly_loan_costs, get_total_remaining_loan_balance,
};
use crate::calculations::taxes::{calculate_taxes, calculate_ug_reserve};
use crate::models::{
    Employee, Investment, LiquidityInput, LiquidityResult, MonthKey, MonthlyCalculation,
    OperatingCosts, YearSummary,
};

/// Number of months a plan covers.
pub const PLAN_MONTHS: usize = 36;

/// Number of calendar years a plan covers.
pub const PLAN_YEARS: i32 = 3;

/// Month keys of `num_years` full calendar years starting in January of
/// `start_year`.
///
/// Returns an empty list when `start_year` cannot form a valid key.
pub fn generate_month_keys(
    start_year: i32,
    num_years: u32,
) -> Vec<MonthKey> {
    match MonthKey::first_of_year(start_year) {
        Ok(first) => first.iter(num_years as usize * 12).collect(),
        Err(e) => {
            warn!(start_year, error = %e, "Cannot build month keys for plan start year");
            Vec::new()
        }
    }
}

fn personnel_costs(
    employees: &[Employee],
    month: MonthKey,
) -> Decimal {
    sum(employees
        .iter()
        .filter(|e| e.is_active_in(month))
        .map(|e| e.monthly_salary))
}

fn operating_costs(
    costs: &OperatingCosts,
    month: MonthKey,
) -> Decimal {
    sum(costs.line_items_for(month).into_iter().map(|(_, amount)| amount))
}

fn investment_costs(
    investments: &[Investment],
    month: MonthKey,
) -> Decimal {
    sum(investments
        .iter()
        .filter(|i| i.month == month)
        .map(|i| i.amount))
}

/// Year-to-date figures used for the monthly tax estimate.
#[derive(Debug, Default)]
struct YearToDate {
    revenue: Decimal,
    expenses: Decimal,
}

impl YearToDate {
    fn profit(&self) -> Decimal {
        self.revenue - self.expenses
    }
}

/// Runs the liquidity plan for `input`.
///
/// Missing inputs count as zero. Items dated before or after the window
/// contribute nothing to it. Stored values are rounded to cents and the
/// running balance continues from the rounded end balance, so each month's
/// start balance equals the previous month's end balance exactly.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use ug_core::calculations::liquidity::calculate_liquidity;
/// use ug_core::models::{LiquidityInput, OperatingCosts, RevenuePlan};
///
/// let input = LiquidityInput::builder()
///     .start_year(2026)
///     .starting_liquidity(dec!(10000))
///     .revenue(RevenuePlan::Fixed { monthly: dec!(2000) })
///     .operating_costs(OperatingCosts::default())
///     .build();
///
/// let result = calculate_liquidity(&input);
///
/// assert_eq!(result.months.len(), 36);
/// assert_eq!(result.year_summaries[&2026].end_liquidity, dec!(34000));
/// ```
pub fn calculate_liquidity(input: &LiquidityInput) -> LiquidityResult {
    let hebesatz = input.company.hebesatz;
    let month_keys = generate_month_keys(input.window.start_year, PLAN_YEARS as u32);

    let mut result = LiquidityResult::default();
    let mut balance = round_half_up(input.window.starting_liquidity);
    let mut ytd = YearToDate::default();

    for (index, &month) in month_keys.iter().enumerate() {
        if month.month() == 1 {
            ytd = YearToDate::default();
        }

        let revenue = input.revenue.amount_for(month, index, month_keys.len());
        let other_income = Decimal::ZERO;
        let total_inflows = revenue + other_income;

        let personnel = personnel_costs(&input.employees, month);
        let operating = operating_costs(&input.operating_costs, month);
        let investment = investment_costs(&input.investments, month);
        let loan_costs: MonthlyLoanCosts = calculate_monthly_loan_costs(&input.loans, month);

        let total_outflows = personnel + operating + investment + loan_costs.total_payment;
        let net_cashflow = total_inflows - total_outflows;

        ytd.revenue += revenue;
        ytd.expenses += personnel + operating + investment + loan_costs.total_interest;

        let month_of_year = Decimal::from(month.month());
        let annualized_profit = ytd.profit() / month_of_year * MONTHS_PER_YEAR;
        let annual_estimate = calculate_taxes(annualized_profit, hebesatz);

        let start_balance = balance;
        let end_balance = round_half_up(start_balance + round_half_up(net_cashflow));
        balance = end_balance;

        debug!(
            month = %month,
            net_cashflow = %round_half_up(net_cashflow),
            end_balance = %end_balance,
            "Month calculated"
        );

        result.months.insert(
            month,
            MonthlyCalculation {
                month,
                revenue: round_half_up(revenue),
                other_income,
                total_inflows: round_half_up(total_inflows),
                personnel_costs: round_half_up(personnel),
                operating_costs: round_half_up(operating),
                investment_costs: round_half_up(investment),
                loan_interest: loan_costs.total_interest,
                loan_principal: loan_costs.total_principal,
                total_outflows: round_half_up(total_outflows),
                net_cashflow: round_half_up(net_cashflow),
                start_balance,
                end_balance,
                koerperschaftsteuer: round_half_up(
                    annual_estimate.koerperschaftsteuer / MONTHS_PER_YEAR,
                ),
                gewerbesteuer: round_half_up(annual_estimate.gewerbesteuer / MONTHS_PER_YEAR),
                solidaritaetszuschlag: round_half_up(
                    annual_estimate.solidaritaetszuschlag / MONTHS_PER_YEAR,
                ),
                loan_remaining_balance: get_total_remaining_loan_balance(&input.loans, month),
            },
        );
    }

    let mut statutory_capital = input.company.stammkapital;
    for year in (0..PLAN_YEARS).map(|offset| input.window.start_year + offset) {
        if let Some(summary) = summarize_year(&result, year, hebesatz, &mut statutory_capital) {
            result.year_summaries.insert(year, summary);
        }
    }

    result
}

/// Rolls up the rounded monthly records of `year`.
///
/// The reserve is accrued on the net profit and added to
/// `statutory_capital` for the following year.
fn summarize_year(
    result: &LiquidityResult,
    year: i32,
    hebesatz: u32,
    statutory_capital: &mut Decimal,
) -> Option<YearSummary> {
    let months: Vec<&MonthlyCalculation> = result.months_of_year(year).collect();
    let last = months.last()?;

    let total_revenue = sum(months.iter().map(|m| m.revenue));
    let total_personnel = sum(months.iter().map(|m| m.personnel_costs));
    let total_operating = sum(months.iter().map(|m| m.operating_costs));
    let total_investment = sum(months.iter().map(|m| m.investment_costs));
    let total_interest = sum(months.iter().map(|m| m.loan_interest));

    let total_costs = total_personnel + total_operating + total_investment + total_interest;
    let gross_profit = total_revenue - total_personnel;
    let operating_profit = gross_profit - total_operating;
    let profit_before_tax = total_revenue - total_costs;

    if profit_before_tax < Decimal::ZERO {
        warn!(year, loss = %profit_before_tax, "Loss-making year; no taxes and no reserve");
    }

    let taxes = calculate_taxes(profit_before_tax, hebesatz);
    let net_profit = profit_before_tax - taxes.total_taxes;

    let ug_reserve = calculate_ug_reserve(net_profit, *statutory_capital);
    *statutory_capital += ug_reserve;

    debug!(
        year,
        profit_before_tax = %profit_before_tax,
        total_taxes = %taxes.total_taxes,
        ug_reserve = %ug_reserve,
        statutory_capital = %statutory_capital,
        "Year summarized"
    );

    Some(YearSummary {
        year,
        total_revenue: round_half_up(total_revenue),
        total_costs: round_half_up(total_costs),
        gross_profit: round_half_up(gross_profit),
        operating_profit: round_half_up(operating_profit),
        profit_before_tax: round_half_up(profit_before_tax),
        total_taxes: taxes.total_taxes,
        net_profit: round_half_up(net_profit),
        end_liquidity: last.end_balance,
        ug_reserve,
    })
}
