//! Plan files: a TOML plan plus optional CSV rosters.
//!
//! ## Plan file
//!
//! The TOML plan mirrors [`LiquidityInput`]: a `[company]` table, a `[plan]`
//! table with `start_year` and `starting_liquidity`, and optional
//! `[revenue]`, `[[employees]]`, `[operating_costs]`, `[[investments]]` and
//! `[[loans]]` sections. Amounts are best written as strings (`"1234.56"`)
//! so they reach the engine without a float round trip.
//!
//! ## CSV rosters
//!
//! A roster given on the command line replaces the matching list of the plan
//! file. Headers are matched by name, cells are trimmed, and empty optional
//! cells read as "not set". Months use the `YYYY-MM` form.
//!
//! | File | Columns (optional in brackets) |
//! |------|--------------------------------|
//! | employees | `role`, `monthly_salary`, `start_month`, [`end_month`], [`is_managing_director`] |
//! | loans | `id`, [`name`], `amount`, `interest_rate`, `term_months`, `start_month`, [`grace_period_months`], [`provision_fee`] |
//! | investments | `name`, `amount`, `month`, [`category`] |
//! | cost items | `name`, `amount`, [`description`] |
//! | revenue | `month`, `amount` (switches the plan to the custom revenue model) |
//!
//! ### Example
//!
//! ```csv
//! role,monthly_salary,start_month,end_month,is_managing_director
//! Geschäftsführer,3000.00,2026-01,,true
//! Werkstudent,1200.00,2026-04,2027-03,
//! ```

use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info};
use ug_core::models::{
    Employee, Investment, InvestmentCategory, LiquidityInput, Loan, MonthKey, OperatingCostItem,
    OperatingCosts, RevenuePlan,
};
use ug_core::validation::PlanValidationError;

/// Errors that can occur while reading a plan and its rosters.
#[derive(Debug, Error)]
pub enum PlanLoadError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("plan file parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    /// A month cell that is not a valid `YYYY-MM` key. `row` is 1-based
    /// (header = row 0).
    #[error("invalid month '{value}' in column '{column}' on row {row}")]
    InvalidMonth {
        value: String,
        column: &'static str,
        row: usize,
    },

    #[error("unrecognised investment category '{value}' on row {row}")]
    InvalidCategory { value: String, row: usize },

    #[error("duplicate month {month} in revenue roster")]
    DuplicateRevenueMonth { month: MonthKey },

    #[error("invalid plan: {0}")]
    Validation(#[from] PlanValidationError),
}

// ---------------------------------------------------------------------------
// CSV rows
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct EmployeeRow {
    role: String,
    monthly_salary: Decimal,
    start_month: String,
    end_month: Option<String>,
    is_managing_director: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct LoanRow {
    id: String,
    name: Option<String>,
    amount: Decimal,
    interest_rate: Decimal,
    term_months: u32,
    start_month: String,
    grace_period_months: Option<u32>,
    provision_fee: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
struct InvestmentRow {
    name: String,
    amount: Decimal,
    month: String,
    category: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CostItemRow {
    name: String,
    amount: Decimal,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RevenueRow {
    month: String,
    amount: Decimal,
}

/// Parses a `YYYY-MM` cell. `row` is 1-based, for error messages.
fn parse_month(
    value: &str,
    column: &'static str,
    row: usize,
) -> Result<MonthKey, PlanLoadError> {
    MonthKey::parse(value).map_err(|_| PlanLoadError::InvalidMonth {
        value: value.to_string(),
        column,
        row,
    })
}

fn parse_category(
    value: Option<&str>,
    row: usize,
) -> Result<InvestmentCategory, PlanLoadError> {
    let Some(value) = value else {
        return Ok(InvestmentCategory::default());
    };

    match value.to_ascii_lowercase().as_str() {
        "equipment" => Ok(InvestmentCategory::Equipment),
        "software" => Ok(InvestmentCategory::Software),
        "furniture" => Ok(InvestmentCategory::Furniture),
        "vehicles" => Ok(InvestmentCategory::Vehicles),
        "other" => Ok(InvestmentCategory::Other),
        _ => Err(PlanLoadError::InvalidCategory {
            value: value.to_string(),
            row,
        }),
    }
}

/// Deserializes every row of `reader` and converts it with `convert`.
///
/// `convert` receives the 1-based row number.
fn read_rows<R, T, U, F>(
    reader: R,
    mut convert: F,
) -> Result<Vec<U>, PlanLoadError>
where
    R: Read,
    T: DeserializeOwned,
    F: FnMut(T, usize) -> Result<U, PlanLoadError>,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(reader);

    csv_reader
        .deserialize::<T>()
        .enumerate()
        .map(|(idx, result)| convert(result?, idx + 1))
        .collect()
}

pub fn parse_employees<R: Read>(reader: R) -> Result<Vec<Employee>, PlanLoadError> {
    read_rows(reader, |row: EmployeeRow, n| {
        Ok(Employee {
            role: row.role,
            monthly_salary: row.monthly_salary,
            start_month: parse_month(&row.start_month, "start_month", n)?,
            end_month: row
                .end_month
                .map(|m| parse_month(&m, "end_month", n))
                .transpose()?,
            is_managing_director: row.is_managing_director.unwrap_or(false),
        })
    })
}

pub fn parse_loans<R: Read>(reader: R) -> Result<Vec<Loan>, PlanLoadError> {
    read_rows(reader, |row: LoanRow, n| {
        Ok(Loan {
            name: row.name.unwrap_or_else(|| row.id.clone()),
            id: row.id,
            amount: row.amount,
            interest_rate: row.interest_rate,
            term_months: row.term_months,
            start_month: parse_month(&row.start_month, "start_month", n)?,
            grace_period_months: row.grace_period_months.unwrap_or(0),
            provision_fee: row.provision_fee,
        })
    })
}

pub fn parse_investments<R: Read>(reader: R) -> Result<Vec<Investment>, PlanLoadError> {
    read_rows(reader, |row: InvestmentRow, n| {
        Ok(Investment {
            name: row.name,
            amount: row.amount,
            month: parse_month(&row.month, "month", n)?,
            category: parse_category(row.category.as_deref(), n)?,
        })
    })
}

pub fn parse_cost_items<R: Read>(reader: R) -> Result<Vec<OperatingCostItem>, PlanLoadError> {
    read_rows(reader, |row: CostItemRow, _| {
        Ok(OperatingCostItem {
            name: row.name,
            amount: row.amount,
            description: row.description,
        })
    })
}

/// Reads a `month,amount` roster into the custom revenue model.
pub fn parse_revenue<R: Read>(reader: R) -> Result<RevenuePlan, PlanLoadError> {
    let entries = read_rows(reader, |row: RevenueRow, n| {
        Ok((parse_month(&row.month, "month", n)?, row.amount))
    })?;

    let mut months = BTreeMap::new();
    for (month, amount) in entries {
        if months.insert(month, amount).is_some() {
            return Err(PlanLoadError::DuplicateRevenueMonth { month });
        }
    }
    Ok(RevenuePlan::Custom { months })
}

/// Parses a TOML plan. The result is not validated.
pub fn parse_plan(content: &str) -> Result<LiquidityInput, PlanLoadError> {
    Ok(toml::from_str(content)?)
}

fn open(path: &Path) -> Result<std::fs::File, PlanLoadError> {
    std::fs::File::open(path).map_err(|source| PlanLoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Where a plan and its optional rosters live on disk.
#[derive(Debug, Clone, Default)]
pub struct PlanSources {
    pub plan: PathBuf,
    pub employees: Option<PathBuf>,
    pub loans: Option<PathBuf>,
    pub investments: Option<PathBuf>,
    pub cost_items: Option<PathBuf>,
    pub revenue: Option<PathBuf>,
}

impl PlanSources {
    pub fn new(plan: impl Into<PathBuf>) -> Self {
        Self {
            plan: plan.into(),
            ..Self::default()
        }
    }

    /// Reads the plan, applies the rosters and validates the result.
    pub fn load(&self) -> Result<LiquidityInput, PlanLoadError> {
        let content = std::fs::read_to_string(&self.plan).map_err(|source| PlanLoadError::Io {
            path: self.plan.clone(),
            source,
        })?;
        let mut input = parse_plan(&content)?;
        debug!(path = %self.plan.display(), "Plan file parsed");

        if let Some(path) = &self.employees {
            input.employees = parse_employees(open(path)?)?;
            info!(path = %path.display(), count = input.employees.len(), "Employees loaded");
        }
        if let Some(path) = &self.loans {
            input.loans = parse_loans(open(path)?)?;
            info!(path = %path.display(), count = input.loans.len(), "Loans loaded");
        }
        if let Some(path) = &self.investments {
            input.investments = parse_investments(open(path)?)?;
            info!(path = %path.display(), count = input.investments.len(), "Investments loaded");
        }
        if let Some(path) = &self.cost_items {
            let items = parse_cost_items(open(path)?)?;
            info!(path = %path.display(), count = items.len(), "Cost items loaded");
            input.operating_costs = OperatingCosts::Items { items };
        }
        if let Some(path) = &self.revenue {
            input.revenue = parse_revenue(open(path)?)?;
            info!(path = %path.display(), "Custom revenue loaded");
        }

        input.validate()?;
        Ok(input)
    }
}

/// Reads and validates a plan file without rosters.
pub fn load_plan(path: &Path) -> Result<LiquidityInput, PlanLoadError> {
    PlanSources::new(path).load()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn month(s: &str) -> MonthKey {
        s.parse().unwrap()
    }

    const MINIMAL_PLAN: &str = r#"
[company]
company_name = "Beispiel UG"
stammkapital = "1000"
hebesatz = 410

[plan]
start_year = 2026
starting_liquidity = "10000"
"#;

    // -----------------------------------------------------------------------
    // parse_plan
    // -----------------------------------------------------------------------

    #[test]
    fn minimal_plan_defaults_everything_else() {
        let input = parse_plan(MINIMAL_PLAN).unwrap();

        assert_eq!(input.company.company_name, "Beispiel UG");
        assert_eq!(input.company.kontokorrent, Decimal::ZERO);
        assert_eq!(input.window.start_year, 2026);
        assert_eq!(input.window.starting_liquidity, dec!(10000));
        assert_eq!(input.revenue, RevenuePlan::default());
        assert_eq!(input.operating_costs, OperatingCosts::default());
        assert!(input.employees.is_empty());
    }

    #[test]
    fn plan_reads_tagged_revenue_and_costs() {
        let toml = format!(
            "{MINIMAL_PLAN}
[revenue]
model = \"growth\"
start = \"2000\"
end = \"12000\"

[operating_costs]
kind = \"items\"

[[operating_costs.items]]
name = \"Miete\"
amount = \"450\"
"
        );

        let input = parse_plan(&toml).unwrap();

        assert_eq!(
            input.revenue,
            RevenuePlan::Growth {
                start: dec!(2000),
                end: dec!(12000),
            }
        );
        assert_eq!(input.operating_costs.line_items_for(month("2026-01")).len(), 1);
    }

    #[test]
    fn plan_rejects_malformed_month() {
        let toml = format!(
            "{MINIMAL_PLAN}
[[investments]]
name = \"Laptop\"
amount = \"1500\"
month = \"2026-3\"
"
        );

        assert!(matches!(parse_plan(&toml), Err(PlanLoadError::Toml(_))));
    }

    // -----------------------------------------------------------------------
    // CSV rosters
    // -----------------------------------------------------------------------

    #[test]
    fn employees_with_optional_cells() {
        let csv = "\
role,monthly_salary,start_month,end_month,is_managing_director
Geschäftsführer, 3000.00 ,2026-01,,true
Werkstudent,1200,2026-04,2027-03,
";

        let employees = parse_employees(csv.as_bytes()).unwrap();

        assert_eq!(
            employees,
            vec![
                Employee {
                    role: "Geschäftsführer".to_string(),
                    monthly_salary: dec!(3000.00),
                    start_month: month("2026-01"),
                    end_month: None,
                    is_managing_director: true,
                },
                Employee {
                    role: "Werkstudent".to_string(),
                    monthly_salary: dec!(1200),
                    start_month: month("2026-04"),
                    end_month: Some(month("2027-03")),
                    is_managing_director: false,
                },
            ]
        );
    }

    #[test]
    fn invalid_month_reports_row_and_column() {
        let csv = "\
role,monthly_salary,start_month
Vertrieb,2500,2026-01
Support,2200,2026-13
";

        let err = parse_employees(csv.as_bytes()).unwrap_err();

        assert_eq!(
            err.to_string(),
            "invalid month '2026-13' in column 'start_month' on row 2"
        );
    }

    #[test]
    fn unpadded_month_is_rejected() {
        let csv = "\
month,amount
2026-1,4000
";

        let err = parse_revenue(csv.as_bytes()).unwrap_err();

        assert!(matches!(
            err,
            PlanLoadError::InvalidMonth { ref value, column: "month", row: 1 } if value == "2026-1"
        ));
    }

    #[test]
    fn loans_default_name_and_grace() {
        let csv = "\
id,amount,interest_rate,term_months,start_month,provision_fee
bank,12000,0.06,12,2026-01,
";

        let loans = parse_loans(csv.as_bytes()).unwrap();

        assert_eq!(loans[0].name, "bank");
        assert_eq!(loans[0].grace_period_months, 0);
        assert_eq!(loans[0].provision_fee, None);
        assert_eq!(loans[0].interest_rate, dec!(0.06));
    }

    #[test]
    fn investments_parse_category_case_insensitively() {
        let csv = "\
name,amount,month,category
Transporter,25000,2026-06,Vehicles
Regal,300,2026-02,
";

        let investments = parse_investments(csv.as_bytes()).unwrap();

        assert_eq!(investments[0].category, InvestmentCategory::Vehicles);
        assert_eq!(investments[1].category, InvestmentCategory::Other);
    }

    #[test]
    fn unknown_investment_category_is_rejected() {
        let csv = "name,amount,month,category\nYacht,90000,2026-06,boats\n";

        let err = parse_investments(csv.as_bytes()).unwrap_err();

        assert!(matches!(
            err,
            PlanLoadError::InvalidCategory { ref value, row: 1 } if value == "boats"
        ));
    }

    #[test]
    fn cost_items_keep_description() {
        let csv = "name,amount,description\nMiete,450,Coworking\nCloud,80,\n";

        let items = parse_cost_items(csv.as_bytes()).unwrap();

        assert_eq!(items[0].description.as_deref(), Some("Coworking"));
        assert_eq!(items[1].description, None);
    }

    #[test]
    fn revenue_roster_builds_custom_model() {
        let csv = "month,amount\n2026-01,1000\n2026-02,1500.50\n";

        let revenue = parse_revenue(csv.as_bytes()).unwrap();

        assert_eq!(
            revenue,
            RevenuePlan::Custom {
                months: BTreeMap::from([
                    (month("2026-01"), dec!(1000)),
                    (month("2026-02"), dec!(1500.50)),
                ]),
            }
        );
    }

    #[test]
    fn revenue_roster_rejects_duplicate_month() {
        let csv = "month,amount\n2026-01,1000\n2026-01,2000\n";

        let err = parse_revenue(csv.as_bytes()).unwrap_err();

        assert!(matches!(err, PlanLoadError::DuplicateRevenueMonth { .. }));
    }

    #[test]
    fn missing_required_column_is_csv_error() {
        let csv = "role,start_month\nVertrieb,2026-01\n";

        let err = parse_employees(csv.as_bytes()).unwrap_err();

        assert!(matches!(err, PlanLoadError::Csv(_)));
    }

    #[test]
    fn missing_plan_file_reports_path() {
        let err = load_plan(Path::new("does/not/exist.toml")).unwrap_err();

        assert!(err.to_string().starts_with("cannot read 'does/not/exist.toml'"));
    }
}
