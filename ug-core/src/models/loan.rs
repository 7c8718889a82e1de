use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::MonthKey;

/// An annuity loan, optionally with a grace period and a provision fee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    pub id: String,

    #[serde(default)]
    pub name: String,

    /// Principal paid out at `start_month`.
    pub amount: Decimal,

    /// Annual interest rate as a decimal (0.035 = 3.5%).
    pub interest_rate: Decimal,

    /// Total term including the grace period.
    pub term_months: u32,

    pub start_month: MonthKey,

    /// Interest-only months at the start (tilgungsfreie Zeit).
    #[serde(default)]
    pub grace_period_months: u32,

    /// One-time fee (Bereitstellungsentgelt) charged in the first month.
    #[serde(default)]
    pub provision_fee: Option<Decimal>,
}

impl Loan {
    /// Months in which principal is repaid.
    pub fn repayment_months(&self) -> u32 {
        self.term_months.saturating_sub(self.grace_period_months)
    }
}
