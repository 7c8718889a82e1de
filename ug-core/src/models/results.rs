use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::MonthKey;

/// Cash-flow record for one month of the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyCalculation {
    pub month: MonthKey,

    // Inflows
    pub revenue: Decimal,
    pub other_income: Decimal,
    pub total_inflows: Decimal,

    // Outflows
    pub personnel_costs: Decimal,
    pub operating_costs: Decimal,
    pub investment_costs: Decimal,
    pub loan_interest: Decimal,
    pub loan_principal: Decimal,
    pub total_outflows: Decimal,

    // Balance
    pub net_cashflow: Decimal,
    pub start_balance: Decimal,
    pub end_balance: Decimal,

    // Prorated tax accrual estimates
    pub koerperschaftsteuer: Decimal,
    pub gewerbesteuer: Decimal,
    pub solidaritaetszuschlag: Decimal,

    /// Outstanding principal across all loans after this month.
    pub loan_remaining_balance: Decimal,
}

impl MonthlyCalculation {
    /// Revenue minus personnel and operating costs.
    pub fn operating_result(&self) -> Decimal {
        self.revenue - (self.personnel_costs + self.operating_costs)
    }

    /// Sum of the three prorated tax estimates.
    pub fn estimated_taxes(&self) -> Decimal {
        self.koerperschaftsteuer + self.gewerbesteuer + self.solidaritaetszuschlag
    }
}

/// Annual rollup of the monthly records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearSummary {
    pub year: i32,
    pub total_revenue: Decimal,

    /// Personnel + operating + investment + loan interest. Principal
    /// repayment is not an expense and is excluded.
    pub total_costs: Decimal,

    /// Revenue minus personnel.
    pub gross_profit: Decimal,

    /// Gross profit minus operating costs.
    pub operating_profit: Decimal,

    pub profit_before_tax: Decimal,
    pub total_taxes: Decimal,
    pub net_profit: Decimal,

    /// Closing balance of the year's last month.
    pub end_liquidity: Decimal,

    /// Statutory reserve accrued from this year's net profit.
    pub ug_reserve: Decimal,
}

/// Output of the liquidity engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityResult {
    pub months: BTreeMap<MonthKey, MonthlyCalculation>,
    pub year_summaries: BTreeMap<i32, YearSummary>,
}

impl LiquidityResult {
    /// Monthly records of one calendar year, in month order.
    pub fn months_of_year(
        &self,
        year: i32,
    ) -> impl Iterator<Item = &MonthlyCalculation> {
        self.months
            .values()
            .filter(move |calc| calc.month.year() == year)
    }
}
