use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::MonthKey;

/// A named recurring monthly cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatingCostItem {
    pub name: String,
    pub amount: Decimal,
    #[serde(default)]
    pub description: Option<String>,
}

/// The ten fixed buckets of the legacy cost form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostCategories {
    pub rent: Decimal,
    pub marketing: Decimal,
    pub insurance: Decimal,
    pub software: Decimal,
    pub legal: Decimal,
    pub accounting: Decimal,
    pub telephone_internet: Decimal,
    pub travel: Decimal,
    pub office_supplies: Decimal,
    pub other: Decimal,
}

impl CostCategories {
    pub const NAMES: [&'static str; 10] = [
        "rent",
        "marketing",
        "insurance",
        "software",
        "legal",
        "accounting",
        "telephone_internet",
        "travel",
        "office_supplies",
        "other",
    ];

    /// The bucket amount for a bucket name, if the name is known.
    pub fn get(
        &self,
        name: &str,
    ) -> Option<Decimal> {
        let value = match name {
            "rent" => self.rent,
            "marketing" => self.marketing,
            "insurance" => self.insurance,
            "software" => self.software,
            "legal" => self.legal,
            "accounting" => self.accounting,
            "telephone_internet" => self.telephone_internet,
            "travel" => self.travel,
            "office_supplies" => self.office_supplies,
            "other" => self.other,
            _ => return None,
        };
        Some(value)
    }
}

/// Operating costs in either the item-list form or the legacy bucket form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OperatingCosts {
    Items {
        #[serde(default)]
        items: Vec<OperatingCostItem>,
    },

    Categories {
        #[serde(default)]
        categories: CostCategories,

        /// Per-month replacements for individual buckets, keyed by bucket name.
        #[serde(default)]
        monthly_overrides: BTreeMap<MonthKey, BTreeMap<String, Decimal>>,
    },
}

impl Default for OperatingCosts {
    fn default() -> Self {
        Self::Items { items: Vec::new() }
    }
}

impl OperatingCosts {
    /// Normalizes either representation into the named amounts due in `month`.
    ///
    /// Legacy overrides replace the base value of their bucket. Override keys
    /// that name no bucket are ignored.
    pub fn line_items_for(
        &self,
        month: MonthKey,
    ) -> Vec<(String, Decimal)> {
        match self {
            Self::Items { items } => items
                .iter()
                .map(|item| (item.name.clone(), item.amount))
                .collect(),
            Self::Categories {
                categories,
                monthly_overrides,
            } => {
                let overrides = monthly_overrides.get(&month);

                if let Some(overrides) = overrides {
                    for key in overrides.keys() {
                        if categories.get(key).is_none() {
                            warn!(
                                month = %month,
                                bucket = %key,
                                "Unknown operating cost bucket in override; ignoring"
                            );
                        }
                    }
                }

                CostCategories::NAMES
                    .iter()
                    .filter_map(|&name| {
                        let base = categories.get(name)?;
                        let amount = overrides
                            .and_then(|o| o.get(name).copied())
                            .unwrap_or(base);
                        Some((name.to_string(), amount))
                    })
                    .collect()
            }
        }
    }
}
