use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::MonthKey;

/// How monthly revenue is derived across the plan window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum RevenuePlan {
    /// The same amount every month.
    Fixed { monthly: Decimal },

    /// Linear growth from `start` in the first month to `end` in the last.
    Growth { start: Decimal, end: Decimal },

    /// Explicit per-month amounts; months without an entry earn nothing.
    Custom {
        #[serde(default)]
        months: BTreeMap<MonthKey, Decimal>,
    },
}

impl RevenuePlan {
    /// Revenue of `month`, the `index`-th month (0-based) of a plan spanning
    /// `plan_months` months.
    pub fn amount_for(
        &self,
        month: MonthKey,
        index: usize,
        plan_months: usize,
    ) -> Decimal {
        match self {
            RevenuePlan::Fixed { monthly } => *monthly,
            RevenuePlan::Growth { start, end } => {
                if plan_months <= 1 {
                    return *start;
                }
                let span = Decimal::from(plan_months - 1);
                *start + (*end - *start) * Decimal::from(index) / span
            }
            RevenuePlan::Custom { months } => months.get(&month).copied().unwrap_or_default(),
        }
    }
}

impl Default for RevenuePlan {
    fn default() -> Self {
        Self::Fixed {
            monthly: Decimal::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn month(s: &str) -> MonthKey {
        s.parse().unwrap()
    }

    #[test]
    fn growth_interpolates_from_start_to_end() {
        let plan = RevenuePlan::Growth {
            start: dec!(1000),
            end: dec!(4500),
        };

        assert_eq!(plan.amount_for(month("2026-01"), 0, 36), dec!(1000));
        assert_eq!(plan.amount_for(month("2026-02"), 1, 36), dec!(1100));
        assert_eq!(plan.amount_for(month("2028-12"), 35, 36), dec!(4500));
    }

    #[test]
    fn custom_months_without_entry_earn_nothing() {
        let plan = RevenuePlan::Custom {
            months: BTreeMap::from([(month("2026-03"), dec!(2500))]),
        };

        assert_eq!(plan.amount_for(month("2026-03"), 2, 36), dec!(2500));
        assert_eq!(plan.amount_for(month("2026-04"), 3, 36), Decimal::ZERO);
    }

    #[test]
    fn revenue_model_is_tagged_in_serde() {
        let plan: RevenuePlan =
            serde_json::from_str(r#"{"model":"fixed","monthly":"8000"}"#).unwrap();

        assert_eq!(plan, RevenuePlan::Fixed { monthly: dec!(8000) });
    }
}
