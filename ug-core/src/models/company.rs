use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Facts about the company entered in the first wizard step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyFacts {
    pub company_name: String,

    /// Registered capital (Stammkapital). A UG may start with as little as 1.
    pub stammkapital: Decimal,

    /// Municipal trade tax multiplier in percent (e.g. 410 for Berlin).
    pub hebesatz: u32,

    /// Overdraft limit (Kontokorrent). Informational only.
    #[serde(default)]
    pub kontokorrent: Decimal,
}

impl Default for CompanyFacts {
    fn default() -> Self {
        Self {
            company_name: String::new(),
            stammkapital: Decimal::ONE,
            hebesatz: 400,
            kontokorrent: Decimal::ZERO,
        }
    }
}

/// The 36-month window a plan covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanWindow {
    pub start_year: i32,

    /// Cash on hand at the start of the first month.
    #[serde(default)]
    pub starting_liquidity: Decimal,
}
