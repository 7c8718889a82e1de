use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::MonthKey;

/// One position on the personnel roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub role: String,

    /// Monthly gross salary (employer cost basis).
    pub monthly_salary: Decimal,

    pub start_month: MonthKey,

    /// Last month the salary is paid, inclusive. `None` means open-ended.
    #[serde(default)]
    pub end_month: Option<MonthKey>,

    /// Marks managing-director compensation (Geschäftsführergehalt).
    /// Classification only; it does not change the arithmetic.
    #[serde(default)]
    pub is_managing_director: bool,
}

impl Employee {
    /// Whether the salary is paid in `month`.
    pub fn is_active_in(
        &self,
        month: MonthKey,
    ) -> bool {
        self.start_month <= month && self.end_month.is_none_or(|end| end >= month)
    }
}
