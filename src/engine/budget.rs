// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Monthly spending limits.
//!
//! Two policies are offered. `Forecast` plans from expected income and
//! subtracts every reserve up front. `CashPosition` starts from what is
//! actually on hand (carry-in plus this month's net flow) and only holds
//! back the savings still owed this month.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::period::{days_in_month, days_remaining_in_month};
use crate::error::{LedgerError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetPolicy {
    #[default]
    Forecast,
    CashPosition,
}

impl BudgetPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetPolicy::Forecast => "forecast",
            BudgetPolicy::CashPosition => "cash",
        }
    }

    pub fn parse(s: &str) -> Result<BudgetPolicy> {
        match s.trim().to_lowercase().as_str() {
            "forecast" => Ok(BudgetPolicy::Forecast),
            "cash" | "cash_position" | "cash-position" => Ok(BudgetPolicy::CashPosition),
            other => Err(LedgerError::Config(format!(
                "unknown budget policy '{}', expected forecast|cash",
                other
            ))),
        }
    }
}

impl fmt::Display for BudgetPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the budget needs, already aggregated for the current month.
#[derive(Debug, Clone, Default)]
pub struct BudgetInputs {
    pub planned_income: Option<Decimal>,
    pub income_month: Decimal,
    pub expense_month: Decimal,
    pub flat_tax_reserve_month: Decimal,
    pub loan_obligations: Decimal,
    pub tax_monthly_reserve: Decimal,
    pub target_monthly: Decimal,
    pub saved_this_month: Decimal,
    pub carry_in: Decimal,
    /// Savings entries already appear as expense transactions.
    pub savings_mirrored: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetReport {
    pub policy: BudgetPolicy,
    pub base_income: Decimal,
    pub spendable_before_saving: Decimal,
    pub allowed_monthly_spend: Decimal,
    pub average_daily_limit: Decimal,
    pub remaining_allowed_spend: Decimal,
    pub daily_limit_from_today: Decimal,
    pub days_in_month: u32,
    pub days_remaining: u32,
    pub free_now: Decimal,
    pub free_forecast: Decimal,
    /// Carry-in plus this month's net flow.
    pub cash_on_hand: Decimal,
}

impl BudgetReport {
    pub fn compute(policy: BudgetPolicy, inputs: &BudgetInputs, today: NaiveDate) -> BudgetReport {
        match policy {
            BudgetPolicy::Forecast => forecast(inputs, today),
            BudgetPolicy::CashPosition => cash_position(inputs, today),
        }
    }
}

/// Savings not already counted in `expense_month`.
fn unmirrored_savings(inputs: &BudgetInputs) -> Decimal {
    if inputs.savings_mirrored {
        Decimal::ZERO
    } else {
        inputs.saved_this_month
    }
}

fn free_amounts(inputs: &BudgetInputs) -> (Decimal, Decimal) {
    let free_now = inputs.income_month - inputs.expense_month;
    let free_forecast = free_now
        - inputs.flat_tax_reserve_month
        - inputs.loan_obligations
        - inputs.tax_monthly_reserve
        - inputs.saved_this_month;
    (free_now, free_forecast)
}

fn forecast(inputs: &BudgetInputs, today: NaiveDate) -> BudgetReport {
    let dim = days_in_month(today);
    let left = days_remaining_in_month(today);

    let base_income = inputs
        .planned_income
        .filter(|p| *p > Decimal::ZERO)
        .unwrap_or(inputs.income_month);
    let spendable_before_saving = (base_income
        - inputs.flat_tax_reserve_month
        - inputs.loan_obligations
        - inputs.tax_monthly_reserve)
        .max(Decimal::ZERO);
    let allowed = (spendable_before_saving - inputs.target_monthly).max(Decimal::ZERO);
    // negative when overspent
    let remaining = allowed - inputs.expense_month;
    let (free_now, free_forecast) = free_amounts(inputs);

    BudgetReport {
        policy: BudgetPolicy::Forecast,
        base_income,
        spendable_before_saving,
        allowed_monthly_spend: allowed,
        average_daily_limit: allowed / Decimal::from(dim),
        remaining_allowed_spend: remaining,
        daily_limit_from_today: remaining / Decimal::from(left),
        days_in_month: dim,
        days_remaining: left,
        free_now,
        free_forecast,
        cash_on_hand: inputs.carry_in + free_now - unmirrored_savings(inputs),
    }
}

fn cash_position(inputs: &BudgetInputs, today: NaiveDate) -> BudgetReport {
    let dim = days_in_month(today);
    let left = days_remaining_in_month(today);

    let (free_now, free_forecast) = free_amounts(inputs);
    let cash_on_hand = inputs.carry_in + free_now - unmirrored_savings(inputs);
    let savings_owed = (inputs.target_monthly - inputs.saved_this_month).max(Decimal::ZERO);
    let remaining = cash_on_hand - savings_owed;

    BudgetReport {
        policy: BudgetPolicy::CashPosition,
        base_income: inputs.carry_in + inputs.income_month,
        spendable_before_saving: cash_on_hand,
        allowed_monthly_spend: cash_on_hand,
        average_daily_limit: cash_on_hand / Decimal::from(dim),
        remaining_allowed_spend: remaining,
        daily_limit_from_today: remaining / Decimal::from(left),
        days_in_month: dim,
        days_remaining: left,
        free_now,
        free_forecast,
        cash_on_hand,
    }
}
