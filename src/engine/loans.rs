// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Simple-interest amortization of irregular loan payments.
//!
//! There is no precomputed schedule. Each payment first covers the interest
//! accrued on the outstanding balance since the previous payment (or since
//! the loan was opened) at `annual_rate / 100 / 365` per day; only the rest
//! reduces principal.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use super::period::{Period, next_day_of_month, whole_days_between};
use crate::error::{Result, invalid};
use crate::models::{Loan, LoanPayment};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Amortization {
    pub days: i64,
    pub daily_rate: Decimal,
    pub interest: Decimal,
    pub principal: Decimal,
    pub balance_before: Decimal,
    pub balance_after: Decimal,
    pub active: bool,
}

pub fn daily_rate(annual_rate_pct: Decimal) -> Decimal {
    annual_rate_pct / Decimal::ONE_HUNDRED / Decimal::from(365)
}

/// Splits `payment` into interest and principal against `loan` as of `payment_date`.
///
/// Interest is rounded to cents. An under-payment leaves principal at zero
/// and the balance unchanged. Fails if the interest does not fit a `Decimal`.
pub fn amortize(loan: &Loan, payment: Decimal, payment_date: NaiveDate) -> Result<Amortization> {
    let since = loan
        .last_payment_date
        .unwrap_or_else(|| loan.created_at.date());
    let days = whole_days_between(since, payment_date);
    // balance * rate / 100 / 365 * days, divided once to keep precision
    let interest = loan
        .balance
        .checked_mul(loan.annual_rate)
        .and_then(|x| x.checked_mul(Decimal::from(days)))
        .ok_or_else(|| invalid(format!("interest on loan {} is out of range", loan.id)))?
        / Decimal::from(36_500);
    let interest = interest.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let principal = (payment - interest).max(Decimal::ZERO);
    let balance_after = (loan.balance - principal).max(Decimal::ZERO);
    Ok(Amortization {
        days,
        daily_rate: daily_rate(loan.annual_rate),
        interest,
        principal,
        balance_before: loan.balance,
        balance_after,
        active: balance_after > Decimal::ZERO,
    })
}

/// Balance implied by the payment log, replayed oldest first from the
/// opening balance.
pub fn rebuild_balance(loan: &Loan, payments: &[LoanPayment]) -> Decimal {
    let mut ordered: Vec<&LoanPayment> =
        payments.iter().filter(|p| p.loan_id == loan.id).collect();
    ordered.sort_by_key(|p| (p.payment_date, p.id));
    ordered.into_iter().fold(loan.opening_balance, |bal, p| {
        (bal - p.principal_amount).max(Decimal::ZERO)
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct LoanStatus {
    pub loan: Loan,
    pub next_due: NaiveDate,
    pub paid_this_month: bool,
    pub interest_paid_total: Decimal,
    pub principal_paid_total: Decimal,
}

pub fn status(loan: &Loan, payments: &[LoanPayment], today: NaiveDate) -> LoanStatus {
    let month = Period::month_of(today);
    let own: Vec<&LoanPayment> = payments.iter().filter(|p| p.loan_id == loan.id).collect();
    LoanStatus {
        loan: loan.clone(),
        next_due: next_day_of_month(loan.payment_day, today),
        paid_this_month: own.iter().any(|p| month.contains(p.payment_date)),
        interest_paid_total: own.iter().map(|p| p.interest_amount).sum(),
        principal_paid_total: own.iter().map(|p| p.principal_amount).sum(),
    }
}

/// Sum of `monthly_payment` over active loans.
pub fn monthly_obligations(loans: &[Loan]) -> Decimal {
    loans
        .iter()
        .filter(|l| l.active)
        .map(|l| l.monthly_payment)
        .sum()
}
