use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::MonthKey;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestmentCategory {
    Equipment,
    Software,
    Furniture,
    Vehicles,
    #[default]
    Other,
}

/// A one-time purchase posted entirely in a single month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Investment {
    pub name: String,
    pub amount: Decimal,
    pub month: MonthKey,
    #[serde(default)]
    pub category: InvestmentCategory,
}
