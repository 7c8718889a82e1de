//! BWA (Betriebswirtschaftliche Auswertung): the three-year performance
//! report banks expect with a loan application.
//!
//! Every row shows one value per plan year and that value as a percentage of
//! the year's revenue. Rows starting with `-` subtract: their values are
//! negated while the percentage is taken of the unsigned amount. Rows
//! starting with `=` are subtotals.
//!
//! | Row | Value |
//! |-----|-------|
//! | Umsatz | total revenue |
//! | = Rohgewinn I | revenue (no material costs are planned) |
//! | = Rohgewinn II | revenue − personnel |
//! | = Erweiterter Cash-flow | operating profit − investments |
//! | = Cash-flow | … − interest |
//! | = Betriebsergebnis (vor Steuern) | profit before tax |
//! | = Betriebsgewinn (nach Steuern) | net profit |
//! | = Ausschüttungsfähiger Gewinn | net profit − UG reserve |

use rust_decimal::{Decimal, RoundingStrategy};

use crate::calculations::common::{percent_of, round_half_up, sum};
use crate::models::{BwaCell, BwaReport, BwaRow, LiquidityResult, YearSummary};

/// Input of [`generate_bwa`].
#[derive(Debug, Clone, Copy)]
pub struct BwaInput<'a> {
    pub company_name: &'a str,
    pub start_year: i32,
    pub liquidity_result: &'a LiquidityResult,
}

/// Figures of one year the rows are derived from.
#[derive(Debug, Default)]
struct YearFigures {
    summary: YearSummary,
    personnel: Decimal,
    operating: Decimal,
    investment: Decimal,
    interest: Decimal,
}

impl YearFigures {
    fn collect(
        result: &LiquidityResult,
        year: i32,
    ) -> Self {
        let Some(summary) = result.year_summaries.get(&year) else {
            return Self::default();
        };

        Self {
            summary: summary.clone(),
            personnel: sum(result.months_of_year(year).map(|m| m.personnel_costs)),
            operating: sum(result.months_of_year(year).map(|m| m.operating_costs)),
            investment: sum(result.months_of_year(year).map(|m| m.investment_costs)),
            interest: sum(result.months_of_year(year).map(|m| m.loan_interest)),
        }
    }

    fn revenue(&self) -> Decimal {
        self.summary.total_revenue
    }

    fn extended_cash_flow(&self) -> Decimal {
        self.summary.operating_profit - self.investment
    }

    fn cash_flow(&self) -> Decimal {
        self.extended_cash_flow() - self.interest
    }

    fn distributable_profit(&self) -> Decimal {
        self.summary.net_profit - self.summary.ug_reserve
    }
}

#[derive(Debug, Clone, Copy)]
enum RowKind {
    /// Value shown as is.
    Plain,
    /// Value shown negated.
    Subtraction,
    /// Always zero; kept for the standard layout.
    Placeholder,
    /// Revenue at 100%, or 0% without revenue.
    FullRevenue,
}

type RowValue = fn(&YearFigures) -> Decimal;

const ROWS: [(&str, RowKind, RowValue); 16] = [
    ("Umsatz", RowKind::Plain, YearFigures::revenue),
    ("+/- Bestandsveränderung", RowKind::Placeholder, |_| Decimal::ZERO),
    ("- Materialeinsatz/Wareneinsatz", RowKind::Placeholder, |_| Decimal::ZERO),
    ("= Rohgewinn I", RowKind::FullRevenue, YearFigures::revenue),
    ("- Personalkosten", RowKind::Subtraction, |y| y.personnel),
    ("= Rohgewinn II", RowKind::Plain, |y| y.summary.gross_profit),
    ("- Betriebskosten", RowKind::Subtraction, |y| y.operating),
    ("- Investitionen", RowKind::Subtraction, |y| y.investment),
    ("= Erweiterter Cash-flow", RowKind::Plain, YearFigures::extended_cash_flow),
    ("- Zinsen", RowKind::Subtraction, |y| y.interest),
    ("= Cash-flow", RowKind::Plain, YearFigures::cash_flow),
    ("= Betriebsergebnis (vor Steuern)", RowKind::Plain, |y| y.summary.profit_before_tax),
    ("- Steuern (geschätzt)", RowKind::Subtraction, |y| y.summary.total_taxes),
    ("= Betriebsgewinn (nach Steuern)", RowKind::Plain, |y| y.summary.net_profit),
    ("- UG Rücklage (25%)", RowKind::Subtraction, |y| y.summary.ug_reserve),
    ("= Ausschüttungsfähiger Gewinn", RowKind::Plain, YearFigures::distributable_profit),
];

fn cell(
    kind: RowKind,
    value: Decimal,
    revenue: Decimal,
) -> BwaCell {
    match kind {
        RowKind::Plain => BwaCell {
            value,
            percent: percent_of(value, revenue),
        },
        RowKind::Subtraction => BwaCell {
            value: -value,
            percent: percent_of(value, revenue),
        },
        RowKind::Placeholder => BwaCell::default(),
        RowKind::FullRevenue => BwaCell {
            value,
            percent: if revenue.is_zero() {
                Decimal::ZERO
            } else {
                Decimal::ONE_HUNDRED
            },
        },
    }
}

/// Builds the BWA for the three plan years starting at `start_year`.
///
/// Years without a summary in the liquidity result show zero rows.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use ug_core::calculations::bwa::{BwaInput, generate_bwa};
/// use ug_core::calculations::liquidity::calculate_liquidity;
/// use ug_core::models::{LiquidityInput, RevenuePlan};
///
/// let input = LiquidityInput::builder()
///     .start_year(2026)
///     .revenue(RevenuePlan::Fixed { monthly: dec!(5000) })
///     .build();
/// let result = calculate_liquidity(&input);
///
/// let bwa = generate_bwa(&BwaInput {
///     company_name: "Beispiel UG",
///     start_year: 2026,
///     liquidity_result: &result,
/// });
///
/// assert_eq!(bwa.rows.len(), 16);
/// assert_eq!(bwa.rows[0].years[0].value, dec!(60000));
/// ```
pub fn generate_bwa(input: &BwaInput<'_>) -> BwaReport {
    let years = [input.start_year, input.start_year + 1, input.start_year + 2];
    let figures = years.map(|year| YearFigures::collect(input.liquidity_result, year));

    let rows = ROWS
        .iter()
        .map(|&(label, kind, value_of)| BwaRow {
            label: label.to_string(),
            years: std::array::from_fn(|i| {
                let year = &figures[i];
                cell(kind, value_of(year), year.revenue())
            }),
        })
        .collect();

    BwaReport {
        company_name: input.company_name.to_string(),
        years,
        rows,
    }
}

/// Formats an amount the German way: `.` groups thousands, `,` separates
/// two decimal places.
///
/// ```
/// use rust_decimal_macros::dec;
/// use ug_core::calculations::bwa::format_bwa_value;
///
/// assert_eq!(format_bwa_value(dec!(-1234567.891)), "-1.234.567,89");
/// ```
pub fn format_bwa_value(value: Decimal) -> String {
    let rounded = round_half_up(value);
    let plain = format!("{:.2}", rounded.abs());
    let (integer, fraction) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped},{fraction}")
}

/// Formats a percentage with one decimal place, e.g. `12.3 %`.
pub fn format_percent(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.1} %")
}
