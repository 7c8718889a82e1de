//! Loan amortization: annuity payments, grace periods and provision fees.
//!
//! # Schedule Rules
//!
//! | Phase | Payment | Principal | Balance |
//! |-------|---------|-----------|---------|
//! | Grace period (tilgungsfreie Zeit) | interest only | 0 | unchanged |
//! | Repayment | level annuity, capped at balance + interest | payment − interest | reduced |
//! | Last month of the term | balance + interest | remaining balance | 0 |
//!
//! The level annuity is computed over the repayment months only
//! (`term_months - grace_period_months`), since grace months repay nothing.
//! A provision fee (Bereitstellungsentgelt) is charged once in the first
//! period of the schedule.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use ug_core::calculations::loans::calculate_monthly_payment;
//!
//! assert_eq!(calculate_monthly_payment(dec!(100000), dec!(0.035), 60), dec!(1819.17));
//! ```

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculations::common::{MONTHS_PER_YEAR, compound_factor, round_half_up, sum};
use crate::models::{Loan, MonthKey};

/// Months of schedule generated when looking up a loan's payment for a month.
pub const SCHEDULE_LOOKAHEAD_MONTHS: usize = 60;

/// Balances at or below this amount count as repaid.
pub const PAID_OFF_TOLERANCE: Decimal = dec!(0.01);

/// Typical KfW provision rate per month on the undisbursed amount.
pub const DEFAULT_KFW_PROVISION_RATE: Decimal = dec!(0.0015);

/// One month of a loan schedule. All amounts are rounded to cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanPayment {
    pub month: MonthKey,
    pub payment: Decimal,
    pub principal: Decimal,
    pub interest: Decimal,
    pub remaining_balance: Decimal,
    pub provision_fee: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanSchedule {
    pub payments: Vec<LoanPayment>,
    pub total_interest: Decimal,
    pub total_principal: Decimal,
    pub total_provision_fees: Decimal,
}

impl LoanSchedule {
    pub fn payment_for(
        &self,
        month: MonthKey,
    ) -> Option<&LoanPayment> {
        self.payments.iter().find(|p| p.month == month)
    }
}

/// Aggregate loan flows of a portfolio in one month.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyLoanCosts {
    /// Principal plus interest. Provision fees are reported separately.
    pub total_payment: Decimal,
    pub total_principal: Decimal,
    pub total_interest: Decimal,
    pub total_provision_fees: Decimal,

    /// Outstanding balance per loan id after this month.
    pub remaining_balances: BTreeMap<String, Decimal>,
}

/// Level monthly payment of an annuity loan, rounded to cents.
///
/// Without interest the principal is split evenly. A zero term yields zero.
pub fn calculate_monthly_payment(
    principal: Decimal,
    annual_rate: Decimal,
    term_months: u32,
) -> Decimal {
    if term_months == 0 {
        warn!(principal = %principal, "Loan term is zero; no payment can be computed");
        return Decimal::ZERO;
    }

    if annual_rate.is_zero() {
        return round_half_up(principal / Decimal::from(term_months));
    }

    let monthly_rate = annual_rate / MONTHS_PER_YEAR;
    let interest_only = principal * monthly_rate;
    let Some(factor) = compound_factor(monthly_rate, term_months) else {
        warn!(
            principal = %principal,
            annual_rate = %annual_rate,
            term_months,
            "Compound factor overflows; payment approaches interest only"
        );
        return round_half_up(interest_only);
    };
    let denominator = factor - Decimal::ONE;
    if denominator.is_zero() {
        return round_half_up(principal / Decimal::from(term_months));
    }

    let payment = interest_only
        .checked_mul(factor)
        .map_or_else(|| interest_only * (factor / denominator), |n| n / denominator);
    round_half_up(payment)
}

/// Builds the month-by-month schedule of `loan` starting at `start_month`.
///
/// Generation stops after `num_months` periods or as soon as the balance is
/// repaid, whichever comes first. The running balance is kept unrounded;
/// the recorded payments are rounded to cents.
pub fn generate_loan_schedule(
    loan: &Loan,
    start_month: MonthKey,
    num_months: usize,
) -> LoanSchedule {
    let monthly_rate = loan.interest_rate / MONTHS_PER_YEAR;
    let grace = loan.grace_period_months as usize;
    let term = loan.term_months as usize;

    let repayment_months = match loan.repayment_months() {
        0 => loan.term_months,
        months => months,
    };
    let level_payment = calculate_monthly_payment(loan.amount, loan.interest_rate, repayment_months);

    let mut remaining_balance = loan.amount;
    let mut total_interest = Decimal::ZERO;
    let mut total_principal = Decimal::ZERO;
    let mut total_provision_fees = Decimal::ZERO;
    let mut payments = Vec::new();

    for (period, month) in start_month.iter(num_months).enumerate() {
        if remaining_balance <= PAID_OFF_TOLERANCE {
            break;
        }

        let interest = remaining_balance * monthly_rate;
        let (payment, principal) = if period < grace {
            (interest, Decimal::ZERO)
        } else {
            let payment = level_payment.min(remaining_balance + interest);
            let principal = payment - interest;

            // Final installment settles whatever the rounded level payment left.
            if period + 1 == term || principal > remaining_balance {
                (remaining_balance + interest, remaining_balance)
            } else if principal < Decimal::ZERO {
                // A level payment below the interest repays nothing.
                (interest, Decimal::ZERO)
            } else {
                (payment, principal)
            }
        };

        let provision_fee = match loan.provision_fee {
            Some(fee) if period == 0 => fee,
            _ => Decimal::ZERO,
        };

        remaining_balance = (remaining_balance - principal).max(Decimal::ZERO);

        total_interest += interest;
        total_principal += principal;
        total_provision_fees += provision_fee;

        payments.push(LoanPayment {
            month,
            payment: round_half_up(payment),
            principal: round_half_up(principal),
            interest: round_half_up(interest),
            remaining_balance: round_half_up(remaining_balance),
            provision_fee: round_half_up(provision_fee),
        });
    }

    if remaining_balance > PAID_OFF_TOLERANCE {
        debug!(
            loan = %loan.id,
            months = payments.len(),
            remaining = %round_half_up(remaining_balance),
            "Schedule window ended before the loan was repaid"
        );
    }

    LoanSchedule {
        payments,
        total_interest: round_half_up(total_interest),
        total_principal: round_half_up(total_principal),
        total_provision_fees: round_half_up(total_provision_fees),
    }
}

/// How a single loan stands in a given month.
enum LoanPosition {
    NotStarted,
    Scheduled(LoanPayment),
    PaidOff,
}

fn loan_position(
    loan: &Loan,
    month: MonthKey,
) -> LoanPosition {
    if loan.start_month > month {
        return LoanPosition::NotStarted;
    }

    // Loans that started long before `month` need a longer window to reach it.
    let elapsed = usize::try_from(loan.start_month.months_until(month)).unwrap_or(0);
    let lookahead = SCHEDULE_LOOKAHEAD_MONTHS.max(elapsed + 1);

    let schedule = generate_loan_schedule(loan, loan.start_month, lookahead);
    match schedule.payment_for(month) {
        Some(payment) => LoanPosition::Scheduled(payment.clone()),
        None => LoanPosition::PaidOff,
    }
}

/// Sums the loan flows of all `loans` in `month`.
///
/// Loans that have not started yet owe their full principal and pay
/// nothing. Loans without a schedule entry for `month` are repaid.
pub fn calculate_monthly_loan_costs(
    loans: &[Loan],
    month: MonthKey,
) -> MonthlyLoanCosts {
    let mut costs = MonthlyLoanCosts::default();

    for loan in loans {
        let balance = match loan_position(loan, month) {
            LoanPosition::NotStarted => loan.amount,
            LoanPosition::Scheduled(payment) => {
                costs.total_payment += payment.payment;
                costs.total_principal += payment.principal;
                costs.total_interest += payment.interest;
                costs.total_provision_fees += payment.provision_fee;
                payment.remaining_balance
            }
            LoanPosition::PaidOff => Decimal::ZERO,
        };
        costs.remaining_balances.insert(loan.id.clone(), balance);
    }

    costs.total_payment = round_half_up(costs.total_payment);
    costs.total_principal = round_half_up(costs.total_principal);
    costs.total_interest = round_half_up(costs.total_interest);
    costs.total_provision_fees = round_half_up(costs.total_provision_fees);
    costs
}

/// Outstanding balance across all `loans` after `month`.
pub fn get_total_remaining_loan_balance(
    loans: &[Loan],
    month: MonthKey,
) -> Decimal {
    let total = sum(loans.iter().map(|loan| match loan_position(loan, month) {
            LoanPosition::NotStarted => loan.amount,
            LoanPosition::Scheduled(payment) => payment.remaining_balance,
            LoanPosition::PaidOff => Decimal::ZERO,
        }));

    round_half_up(total)
}

/// KfW Bereitstellungsprovision for the months a loan stays undisbursed.
pub fn calculate_kfw_provision_fee(
    loan_amount: Decimal,
    months_before_disbursement: u32,
    provision_rate: Decimal,
) -> Decimal {
    round_half_up(loan_amount * provision_rate * Decimal::from(months_before_disbursement))
}
