//! Plain-text rendering of plan results for the terminal.

use std::fmt::Write;

use clap::ValueEnum;
use rust_decimal::Decimal;
use ug_core::calculations::bwa::{format_bwa_value, format_percent};
use ug_core::calculations::kpi::{PlanKpis, Runway};
use ug_core::models::{BwaReport, LiquidityResult};

/// Which report the CLI prints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    /// Month-by-month cash flow.
    Liquidity,
    /// Yearly totals.
    Summary,
    /// Betriebswirtschaftliche Auswertung.
    Bwa,
    /// Headline figures.
    Kpi,
    #[default]
    All,
}

impl ReportKind {
    pub fn includes(
        self,
        other: ReportKind,
    ) -> bool {
        self == ReportKind::All || self == other
    }
}

fn money(value: Decimal) -> String {
    format_bwa_value(value)
}

/// One line per month: inflows, outflows, net cash flow and balances.
pub fn render_liquidity(result: &LiquidityResult) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<8} {:>14} {:>14} {:>14} {:>14} {:>14}",
        "Monat", "Einnahmen", "Ausgaben", "Saldo", "Anfang", "Ende"
    );

    for calc in result.months.values() {
        let marker = if calc.end_balance < Decimal::ZERO { " !" } else { "" };
        let _ = writeln!(
            out,
            "{:<8} {:>14} {:>14} {:>14} {:>14} {:>14}{}",
            calc.month.to_string(),
            money(calc.total_inflows),
            money(calc.total_outflows),
            money(calc.net_cashflow),
            money(calc.start_balance),
            money(calc.end_balance),
            marker,
        );
    }
    out
}

/// One block per plan year.
pub fn render_summaries(result: &LiquidityResult) -> String {
    let mut out = String::new();

    for summary in result.year_summaries.values() {
        let _ = writeln!(out, "{}", summary.year);
        let lines = [
            ("Umsatz", summary.total_revenue),
            ("Kosten", summary.total_costs),
            ("Rohgewinn", summary.gross_profit),
            ("Betriebsergebnis", summary.operating_profit),
            ("Gewinn vor Steuern", summary.profit_before_tax),
            ("Steuern", summary.total_taxes),
            ("Jahresüberschuss", summary.net_profit),
            ("UG Rücklage", summary.ug_reserve),
            ("Liquidität am Jahresende", summary.end_liquidity),
        ];
        for (label, value) in lines {
            let _ = writeln!(out, "  {label:<26} {:>14}", money(value));
        }
    }
    out
}

/// The BWA as a table with value and percent columns per year.
pub fn render_bwa(report: &BwaReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "BWA {}", report.company_name);

    let _ = write!(out, "{:<34}", "");
    for year in report.years {
        let _ = write!(out, " {year:>14} {:>8}", "%");
    }
    let _ = writeln!(out);

    for row in &report.rows {
        if row.is_subtotal() {
            let _ = writeln!(out, "{}", "-".repeat(34 + 3 * 24));
        }
        let _ = write!(out, "{:<34}", row.label);
        for cell in &row.years {
            let _ = write!(
                out,
                " {:>14} {:>8}",
                money(cell.value),
                format_percent(cell.percent)
            );
        }
        let _ = writeln!(out);
    }
    out
}

pub fn render_kpis(kpis: &PlanKpis) -> String {
    let mut out = String::new();

    let break_even = kpis
        .break_even_month
        .map_or_else(|| "nicht erreicht".to_string(), |m| m.to_string());
    let runway = match kpis.runway {
        Runway::Beyond => "> 36 Monate".to_string(),
        Runway::NegativeAt(month) => format!("negativ ab {month}"),
    };

    let _ = writeln!(out, "Umsatzwachstum        {} %", kpis.revenue_growth);
    let _ = writeln!(out, "Break-even            {break_even}");
    let _ = writeln!(out, "Liquiditätsreichweite {runway}");
    let _ = writeln!(out, "Burn Rate (Jahr 1)    {}", money(kpis.burn_rate));
    let _ = writeln!(out, "Gewinnmarge (Jahr 3)  {} %", kpis.profit_margin);
    let _ = writeln!(out, "Steuern (3 Jahre)     {}", money(kpis.total_taxes));
    let _ = writeln!(
        out,
        "UG Rücklage           {} ({})",
        money(kpis.total_ug_reserve),
        format_percent(kpis.reserve_progress)
    );

    for warning in &kpis.liquidity_warnings {
        let _ = writeln!(
            out,
            "Warnung: Liquidität {} im {}",
            money(warning.balance),
            warning.month
        );
    }
    out
}
