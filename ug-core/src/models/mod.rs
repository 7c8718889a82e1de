mod bwa;
mod company;
mod investment;
mod loan;
mod month_key;
mod operating_costs;
mod personnel;
mod plan_input;
mod results;
mod revenue;

pub use bwa::{BwaCell, BwaReport, BwaRow, SUBTOTAL_PREFIX};
pub use company::{CompanyFacts, PlanWindow};
pub use investment::{Investment, InvestmentCategory};
pub use loan::Loan;
pub use month_key::{MonthKey, MonthKeyError};
pub use operating_costs::{CostCategories, OperatingCostItem, OperatingCosts};
pub use personnel::Employee;
pub use plan_input::{LiquidityInput, PlanBuilder, default_expense_items};
pub use results::{LiquidityResult, MonthlyCalculation, YearSummary};
pub use revenue::RevenuePlan;
