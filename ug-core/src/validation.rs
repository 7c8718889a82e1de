//! Range checks for plan input.
//!
//! The calculation engine accepts any input and defaults silently. Callers
//! that read plans from outside (files, forms) run [`LiquidityInput::validate`]
//! first to reject values the planning form would never allow.
//!
//! | Field | Allowed |
//! |-------|---------|
//! | Stammkapital | ≥ 1 |
//! | Hebesatz | 200..=900 |
//! | Start year | 2020..=2050 |
//! | Starting liquidity, Kontokorrent | ≥ 0 |
//! | Revenue, salaries, costs, amounts, fees | ≥ 0 |
//! | Loan interest rate | 0..=1 |
//! | Loan term | ≥ 1 month |

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{LiquidityInput, Loan, OperatingCosts, RevenuePlan};

pub const MIN_STAMMKAPITAL: Decimal = Decimal::ONE;
pub const HEBESATZ_RANGE: std::ops::RangeInclusive<u32> = 200..=900;
pub const START_YEAR_RANGE: std::ops::RangeInclusive<i32> = 2020..=2050;

/// The first rule a plan violates.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanValidationError {
    #[error("Stammkapital must be at least 1, got {0}")]
    StammkapitalTooLow(Decimal),

    #[error("Hebesatz must be between 200 and 900, got {0}")]
    HebesatzOutOfRange(u32),

    #[error("start year must be between 2020 and 2050, got {0}")]
    StartYearOutOfRange(i32),

    #[error("{field} must not be negative, got {value}")]
    Negative { field: String, value: Decimal },

    #[error("interest rate of loan '{loan}' must be between 0 and 1, got {rate}")]
    InterestRateOutOfRange { loan: String, rate: Decimal },

    #[error("term of loan '{0}' must be at least one month")]
    ZeroTerm(String),
}

fn non_negative(
    field: impl Into<String>,
    value: Decimal,
) -> Result<(), PlanValidationError> {
    if value < Decimal::ZERO {
        return Err(PlanValidationError::Negative {
            field: field.into(),
            value,
        });
    }
    Ok(())
}

fn validate_loan(loan: &Loan) -> Result<(), PlanValidationError> {
    non_negative(format!("amount of loan '{}'", loan.id), loan.amount)?;
    if loan.interest_rate < Decimal::ZERO || loan.interest_rate > Decimal::ONE {
        return Err(PlanValidationError::InterestRateOutOfRange {
            loan: loan.id.clone(),
            rate: loan.interest_rate,
        });
    }
    if loan.term_months == 0 {
        return Err(PlanValidationError::ZeroTerm(loan.id.clone()));
    }
    if let Some(fee) = loan.provision_fee {
        non_negative(format!("provision fee of loan '{}'", loan.id), fee)?;
    }
    Ok(())
}

fn validate_revenue(revenue: &RevenuePlan) -> Result<(), PlanValidationError> {
    match revenue {
        RevenuePlan::Fixed { monthly } => non_negative("fixed monthly revenue", *monthly),
        RevenuePlan::Growth { start, end } => {
            non_negative("growth start revenue", *start)?;
            non_negative("growth end revenue", *end)
        }
        RevenuePlan::Custom { months } => months
            .iter()
            .try_for_each(|(month, amount)| non_negative(format!("revenue of {month}"), *amount)),
    }
}

fn validate_operating_costs(costs: &OperatingCosts) -> Result<(), PlanValidationError> {
    match costs {
        OperatingCosts::Items { items } => items
            .iter()
            .try_for_each(|item| non_negative(format!("cost item '{}'", item.name), item.amount)),
        OperatingCosts::Categories {
            categories,
            monthly_overrides,
        } => {
            for name in crate::models::CostCategories::NAMES {
                if let Some(value) = categories.get(name) {
                    non_negative(format!("cost bucket '{name}'"), value)?;
                }
            }
            for (month, overrides) in monthly_overrides {
                for (name, value) in overrides {
                    non_negative(format!("override of '{name}' in {month}"), *value)?;
                }
            }
            Ok(())
        }
    }
}

impl LiquidityInput {
    /// Checks every field against the ranges the planning form enforces.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use ug_core::models::{CompanyFacts, LiquidityInput};
    /// use ug_core::validation::PlanValidationError;
    ///
    /// let input = LiquidityInput::builder()
    ///     .start_year(2026)
    ///     .company(CompanyFacts { hebesatz: 150, ..CompanyFacts::default() })
    ///     .build();
    ///
    /// assert_eq!(input.validate(), Err(PlanValidationError::HebesatzOutOfRange(150)));
    /// ```
    pub fn validate(&self) -> Result<(), PlanValidationError> {
        let company = &self.company;
        if company.stammkapital < MIN_STAMMKAPITAL {
            return Err(PlanValidationError::StammkapitalTooLow(company.stammkapital));
        }
        if !HEBESATZ_RANGE.contains(&company.hebesatz) {
            return Err(PlanValidationError::HebesatzOutOfRange(company.hebesatz));
        }
        non_negative("Kontokorrent", company.kontokorrent)?;

        if !START_YEAR_RANGE.contains(&self.window.start_year) {
            return Err(PlanValidationError::StartYearOutOfRange(self.window.start_year));
        }
        non_negative("starting liquidity", self.window.starting_liquidity)?;

        validate_revenue(&self.revenue)?;

        for employee in &self.employees {
            non_negative(format!("salary of '{}'", employee.role), employee.monthly_salary)?;
        }

        validate_operating_costs(&self.operating_costs)?;

        for investment in &self.investments {
            non_negative(format!("investment '{}'", investment.name), investment.amount)?;
        }

        self.loans.iter().try_for_each(validate_loan)
    }
}
