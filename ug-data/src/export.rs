//! Writing plan results to CSV and JSON.
//!
//! The monthly CSV has one row per month with the columns of
//! `MonthlyCalculation` in declaration order. The JSON document bundles the
//! full liquidity result, the BWA and the KPIs.

use std::io::Write;

use serde::Serialize;
use thiserror::Error;
use ug_core::calculations::kpi::PlanKpis;
use ug_core::models::{BwaReport, LiquidityResult};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON write error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything a plan run produced, as written by [`write_json`].
#[derive(Debug, Serialize)]
pub struct PlanExport<'a> {
    pub company_name: &'a str,
    pub liquidity: &'a LiquidityResult,
    pub bwa: &'a BwaReport,
    pub kpis: &'a PlanKpis,
}

/// Writes one CSV row per month, with a header row.
pub fn write_monthly_csv<W: Write>(
    result: &LiquidityResult,
    writer: W,
) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for calc in result.months.values() {
        csv_writer.serialize(calc)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Writes one CSV row per plan year, with a header row.
pub fn write_year_summaries_csv<W: Write>(
    result: &LiquidityResult,
    writer: W,
) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for summary in result.year_summaries.values() {
        csv_writer.serialize(summary)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Writes `export` as pretty-printed JSON followed by a newline.
pub fn write_json<W: Write>(
    export: &PlanExport<'_>,
    mut writer: W,
) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(&mut writer, export)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use ug_core::calculations::bwa::{BwaInput, generate_bwa};
    use ug_core::calculations::liquidity::calculate_liquidity;
    use ug_core::models::{PlanBuilder, RevenuePlan};

    use super::*;

    fn sample() -> LiquidityResult {
        let input = PlanBuilder::new()
            .start_year(2026)
            .starting_liquidity(dec!(5000))
            .revenue(RevenuePlan::Fixed {
                monthly: dec!(2000),
            })
            .build();
        calculate_liquidity(&input)
    }

    #[test]
    fn monthly_csv_has_header_and_36_rows() {
        let mut out = Vec::new();

        write_monthly_csv(&sample(), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 37);
        assert!(lines[0].starts_with("month,revenue,other_income,total_inflows"));
        assert!(lines[1].starts_with("2026-01,"));
        assert!(lines[36].starts_with("2028-12,"));
    }

    #[test]
    fn year_summary_csv_has_three_rows() {
        let mut out = Vec::new();

        write_year_summaries_csv(&sample(), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 4);
        assert!(text.starts_with("year,total_revenue,total_costs"));
    }

    #[test]
    fn json_keys_months_by_string() {
        let result = sample();
        let bwa = generate_bwa(&BwaInput {
            company_name: "Beispiel UG",
            start_year: 2026,
            liquidity_result: &result,
        });
        let kpis = PlanKpis::from_result(&result);
        let mut out = Vec::new();

        write_json(
            &PlanExport {
                company_name: "Beispiel UG",
                liquidity: &result,
                bwa: &bwa,
                kpis: &kpis,
            },
            &mut out,
        )
        .unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["company_name"], "Beispiel UG");
        assert_eq!(value["liquidity"]["months"]["2026-01"]["month"], "2026-01");
        assert_eq!(value["liquidity"]["year_summaries"]["2026"]["year"], 2026);
        assert_eq!(value["bwa"]["rows"].as_array().map(Vec::len), Some(16));
        assert_eq!(value["kpis"]["runway"]["kind"], "beyond");
    }
}
