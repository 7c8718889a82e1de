use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info, warn};

use ug_core::calculations::bwa::{BwaInput, generate_bwa};
use ug_core::calculations::kpi::PlanKpis;
use ug_core::calculations::liquidity::calculate_liquidity;
use ug_data::export::{PlanExport, write_json, write_monthly_csv, write_year_summaries_csv};
use ug_data::logging::init_logging;
use ug_data::report::{self, ReportKind};
use ug_data::PlanSources;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Three-year liquidity and profitability plan for a German UG.
///
/// Reads a TOML plan, optionally replaces its lists with CSV rosters,
/// and prints the liquidity plan, year summaries, BWA and KPIs.
#[derive(Debug, Parser)]
#[command(name = "ug-plan")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the TOML plan file.
    plan: PathBuf,

    /// CSV roster of employees, replaces `[[employees]]`.
    #[arg(long)]
    employees: Option<PathBuf>,

    /// CSV roster of loans, replaces `[[loans]]`.
    #[arg(long)]
    loans: Option<PathBuf>,

    /// CSV roster of investments, replaces `[[investments]]`.
    #[arg(long)]
    investments: Option<PathBuf>,

    /// CSV list of monthly cost items, replaces `[operating_costs]`.
    #[arg(long)]
    cost_items: Option<PathBuf>,

    /// CSV of revenue per month; switches to the custom revenue model.
    #[arg(long)]
    revenue: Option<PathBuf>,

    /// Report to print.
    #[arg(long, value_enum, default_value_t = ReportKind::All)]
    report: ReportKind,

    /// Write the monthly liquidity plan as CSV to this path.
    #[arg(long)]
    export_csv: Option<PathBuf>,

    /// Write the year summaries as CSV to this path.
    #[arg(long)]
    export_summary_csv: Option<PathBuf>,

    /// Write all results as JSON to this path.
    #[arg(long)]
    export_json: Option<PathBuf>,

    /// Log at debug level unless `RUST_LOG` is set.
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

impl Cli {
    fn sources(&self) -> PlanSources {
        PlanSources {
            plan: self.plan.clone(),
            employees: self.employees.clone(),
            loans: self.loans.clone(),
            investments: self.investments.clone(),
            cost_items: self.cost_items.clone(),
            revenue: self.revenue.clone(),
        }
    }
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file =
        File::create(path).with_context(|| format!("Failed to create: {}", path.display()))?;
    Ok(BufWriter::new(file))
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let input = cli
        .sources()
        .load()
        .with_context(|| format!("Failed to load plan: {}", cli.plan.display()))?;
    let company_name = input.company.company_name.as_str();
    info!(company = company_name, start_year = input.window.start_year, "Plan loaded");

    let liquidity = calculate_liquidity(&input);
    let bwa = generate_bwa(&BwaInput {
        company_name,
        start_year: input.window.start_year,
        liquidity_result: &liquidity,
    });
    let kpis = PlanKpis::from_result(&liquidity);
    debug!(months = liquidity.months.len(), "Plan calculated");

    if !kpis.liquidity_warnings.is_empty() {
        warn!(
            months = kpis.liquidity_warnings.len(),
            "Plan has months with negative liquidity"
        );
    }

    let mut out = io::stdout().lock();
    let sections = [
        (ReportKind::Liquidity, report::render_liquidity(&liquidity)),
        (ReportKind::Summary, report::render_summaries(&liquidity)),
        (ReportKind::Bwa, report::render_bwa(&bwa)),
        (ReportKind::Kpi, report::render_kpis(&kpis)),
    ];
    for (kind, text) in sections {
        if cli.report.includes(kind) {
            writeln!(out, "{text}")?;
        }
    }

    if let Some(path) = &cli.export_csv {
        write_monthly_csv(&liquidity, create(path)?)
            .with_context(|| format!("Failed to write CSV: {}", path.display()))?;
        info!(path = %path.display(), "Liquidity plan exported");
    }

    if let Some(path) = &cli.export_summary_csv {
        write_year_summaries_csv(&liquidity, create(path)?)
            .with_context(|| format!("Failed to write CSV: {}", path.display()))?;
        info!(path = %path.display(), "Year summaries exported");
    }

    if let Some(path) = &cli.export_json {
        let export = PlanExport {
            company_name,
            liquidity: &liquidity,
            bwa: &bwa,
            kpis: &kpis,
        };
        write_json(&export, create(path)?)
            .with_context(|| format!("Failed to write JSON: {}", path.display()))?;
        info!(path = %path.display(), "Results exported");
    }

    Ok(())
}
