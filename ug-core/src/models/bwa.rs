use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Label prefix marking subtotal and result rows.
pub const SUBTOTAL_PREFIX: char = '=';

/// A value and its share of the year's revenue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BwaCell {
    pub value: Decimal,
    /// Percent of the year's revenue, one decimal place.
    pub percent: Decimal,
}

/// One line of the BWA report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BwaRow {
    pub label: String,
    /// One cell per plan year, in year order.
    pub years: [BwaCell; 3],
}

impl BwaRow {
    /// Rows whose label starts with `=` are subtotals or results and are
    /// rendered with emphasis.
    pub fn is_subtotal(&self) -> bool {
        self.label.starts_with(SUBTOTAL_PREFIX)
    }
}

/// The three-year BWA as handed to renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BwaReport {
    pub company_name: String,
    pub years: [i32; 3],
    pub rows: Vec<BwaRow>,
}

impl BwaReport {
    pub fn row(
        &self,
        label: &str,
    ) -> Option<&BwaRow> {
        self.rows.iter().find(|row| row.label == label)
    }
}
