//! Financial plan calculations for a German UG.
//!
//! The modules build on each other: taxes and loans feed the liquidity
//! engine, whose result feeds the BWA report and the plan KPIs.

pub mod bwa;
pub mod common;
pub mod kpi;
pub mod liquidity;
pub mod loans;
pub mod taxes;
pub mod vat;

pub use bwa::{BwaInput, format_bwa_value, format_percent, generate_bwa};
pub use kpi::{LiquidityWarning, PlanKpis, Runway};
pub use liquidity::{PLAN_MONTHS, calculate_liquidity, generate_month_keys};
pub use loans::{LoanPayment, LoanSchedule, MonthlyLoanCosts, generate_loan_schedule};
pub use taxes::{TaxResult, calculate_taxes, calculate_ug_reserve};
pub use vat::{AnnualVat, REDUCED_VAT_RATE, STANDARD_VAT_RATE, VatRate, VatResult};
