use chrono::{Datelike, Local};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::models::{
    CompanyFacts, Employee, Investment, Loan, OperatingCostItem, OperatingCosts, PlanWindow,
    RevenuePlan,
};

/// Everything the liquidity engine needs for one plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityInput {
    pub company: CompanyFacts,

    #[serde(rename = "plan")]
    pub window: PlanWindow,

    #[serde(default)]
    pub revenue: RevenuePlan,

    #[serde(default)]
    pub employees: Vec<Employee>,

    #[serde(default)]
    pub operating_costs: OperatingCosts,

    #[serde(default)]
    pub investments: Vec<Investment>,

    #[serde(default)]
    pub loans: Vec<Loan>,
}

impl LiquidityInput {
    pub fn builder() -> PlanBuilder {
        PlanBuilder::new()
    }
}

/// Cost items a new plan starts with.
pub fn default_expense_items() -> Vec<OperatingCostItem> {
    [
        ("Miete", dec!(200), "Büro, Coworking, Lager"),
        ("Telefon & Internet", dec!(50), "Festnetz, Mobil, DSL"),
        ("Fahrt-/Reisekosten", dec!(150), "PKW, Benzin, Leasing"),
        ("Versicherungen", dec!(50), "Betriebshaftpflicht, etc."),
        ("Marketing", dec!(200), "Web, Social Media, Werbung"),
        ("Software Lizenzen", dec!(100), "Zoom, Microsoft, SaaS"),
        ("Steuerberater", dec!(150), "Buchhaltung, DATEV"),
    ]
    .into_iter()
    .map(|(name, amount, description)| OperatingCostItem {
        name: name.to_string(),
        amount,
        description: Some(description.to_string()),
    })
    .collect()
}

/// Accumulates plan data step by step and produces a complete
/// [`LiquidityInput`] for a single engine run.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use ug_core::models::{LiquidityInput, RevenuePlan};
///
/// let input = LiquidityInput::builder()
///     .start_year(2026)
///     .starting_liquidity(dec!(5000))
///     .revenue(RevenuePlan::Fixed { monthly: dec!(8000) })
///     .build();
///
/// assert_eq!(input.window.start_year, 2026);
/// assert_eq!(input.company.hebesatz, 400);
/// ```
#[derive(Debug, Clone)]
pub struct PlanBuilder {
    input: LiquidityInput,
}

impl Default for PlanBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PlanBuilder {
    /// Starts a plan for the current calendar year with the default cost items.
    pub fn new() -> Self {
        Self {
            input: LiquidityInput {
                company: CompanyFacts::default(),
                window: PlanWindow {
                    start_year: Local::now().year(),
                    starting_liquidity: Decimal::ZERO,
                },
                revenue: RevenuePlan::default(),
                employees: Vec::new(),
                operating_costs: OperatingCosts::Items {
                    items: default_expense_items(),
                },
                investments: Vec::new(),
                loans: Vec::new(),
            },
        }
    }

    pub fn company(
        mut self,
        company: CompanyFacts,
    ) -> Self {
        self.input.company = company;
        self
    }

    pub fn start_year(
        mut self,
        year: i32,
    ) -> Self {
        self.input.window.start_year = year;
        self
    }

    pub fn starting_liquidity(
        mut self,
        amount: Decimal,
    ) -> Self {
        self.input.window.starting_liquidity = amount;
        self
    }

    pub fn revenue(
        mut self,
        revenue: RevenuePlan,
    ) -> Self {
        self.input.revenue = revenue;
        self
    }

    pub fn employee(
        mut self,
        employee: Employee,
    ) -> Self {
        self.input.employees.push(employee);
        self
    }

    pub fn employees<I>(
        mut self,
        employees: I,
    ) -> Self
    where
        I: IntoIterator<Item = Employee>,
    {
        self.input.employees.extend(employees);
        self
    }

    pub fn operating_costs(
        mut self,
        costs: OperatingCosts,
    ) -> Self {
        self.input.operating_costs = costs;
        self
    }

    /// Appends a cost item, switching a legacy bucket plan to item form.
    pub fn cost_item(
        mut self,
        item: OperatingCostItem,
    ) -> Self {
        match &mut self.input.operating_costs {
            OperatingCosts::Items { items } => items.push(item),
            OperatingCosts::Categories { .. } => {
                self.input.operating_costs = OperatingCosts::Items { items: vec![item] };
            }
        }
        self
    }

    /// Removes every cost item with the given name.
    pub fn remove_cost_item(
        mut self,
        name: &str,
    ) -> Self {
        if let OperatingCosts::Items { items } = &mut self.input.operating_costs {
            items.retain(|item| item.name != name);
        }
        self
    }

    pub fn investment(
        mut self,
        investment: Investment,
    ) -> Self {
        self.input.investments.push(investment);
        self
    }

    /// Adds a loan, replacing any existing loan with the same id.
    pub fn loan(
        mut self,
        loan: Loan,
    ) -> Self {
        self.input.loans.retain(|existing| existing.id != loan.id);
        self.input.loans.push(loan);
        self
    }

    pub fn remove_loan(
        mut self,
        id: &str,
    ) -> Self {
        self.input.loans.retain(|loan| loan.id != id);
        self
    }

    pub fn build(self) -> LiquidityInput {
        self.input
    }
}
