// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Runtime settings kept in the `settings` key/value table.

use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::engine::budget::BudgetPolicy;
use crate::error::{LedgerError, Result};
use crate::store;

pub const PLANNED_INCOME: &str = "planned_income";
pub const BUDGET_POLICY: &str = "budget_policy";
pub const MIRROR_SAVINGS: &str = "mirror_savings";
pub const CURRENCY_SYMBOL: &str = "currency_symbol";

pub const KEYS: [&str; 4] = [PLANNED_INCOME, BUDGET_POLICY, MIRROR_SAVINGS, CURRENCY_SYMBOL];

pub const DEFAULT_CURRENCY_SYMBOL: &str = "₽";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    /// Expected income for the month; month-to-date income is used when unset.
    pub planned_income: Option<Decimal>,
    pub budget_policy: BudgetPolicy,
    /// Whether savings entries also land in the ledger as expenses.
    pub mirror_savings: bool,
    pub currency_symbol: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            planned_income: None,
            budget_policy: BudgetPolicy::Forecast,
            mirror_savings: true,
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
        }
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_planned_income(s: &str) -> Result<Option<Decimal>> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(None);
    }
    let d = s
        .replacen(',', ".", 1)
        .parse::<Decimal>()
        .map_err(|_| LedgerError::Config(format!("planned_income '{}' is not a number", s)))?;
    if d < Decimal::ZERO {
        return Err(LedgerError::Config("planned_income must be >= 0".into()));
    }
    Ok(Some(d))
}

impl Settings {
    /// Reads every key, falling back to the default for missing or unreadable values.
    pub fn load(conn: &Connection) -> Result<Settings> {
        let mut s = Settings::default();
        if let Some(v) = store::get_setting(conn, PLANNED_INCOME)? {
            match parse_planned_income(&v) {
                Ok(p) => s.planned_income = p,
                Err(e) => tracing::warn!(error = %e, "ignoring stored planned_income"),
            }
        }
        if let Some(v) = store::get_setting(conn, BUDGET_POLICY)? {
            match BudgetPolicy::parse(&v) {
                Ok(p) => s.budget_policy = p,
                Err(e) => tracing::warn!(error = %e, "ignoring stored budget_policy"),
            }
        }
        if let Some(v) = store::get_setting(conn, MIRROR_SAVINGS)? {
            match parse_bool(&v) {
                Some(b) => s.mirror_savings = b,
                None => tracing::warn!(value = %v, "ignoring stored mirror_savings"),
            }
        }
        if let Some(v) = store::get_setting(conn, CURRENCY_SYMBOL)? {
            s.currency_symbol = v;
        }
        Ok(s)
    }

    /// Current value of `key` as text, defaults included.
    pub fn get(&self, key: &str) -> Result<String> {
        Ok(match key {
            PLANNED_INCOME => self
                .planned_income
                .map(|d| d.to_string())
                .unwrap_or_default(),
            BUDGET_POLICY => self.budget_policy.as_str().to_string(),
            MIRROR_SAVINGS => self.mirror_savings.to_string(),
            CURRENCY_SYMBOL => self.currency_symbol.clone(),
            other => return Err(unknown_key(other)),
        })
    }
}

fn unknown_key(key: &str) -> LedgerError {
    LedgerError::Config(format!(
        "unknown setting '{}', expected one of: {}",
        key,
        KEYS.join(", ")
    ))
}

/// Validates and stores one setting. An empty `planned_income` clears it.
pub fn set(conn: &Connection, key: &str, value: &str) -> Result<()> {
    let canonical = match key {
        PLANNED_INCOME => match parse_planned_income(value)? {
            Some(d) => d.to_string(),
            None => {
                store::clear_setting(conn, key)?;
                return Ok(());
            }
        },
        BUDGET_POLICY => BudgetPolicy::parse(value)?.as_str().to_string(),
        MIRROR_SAVINGS => parse_bool(value)
            .ok_or_else(|| {
                LedgerError::Config(format!("mirror_savings '{}' is not a boolean", value))
            })?
            .to_string(),
        CURRENCY_SYMBOL => value.trim().to_string(),
        other => return Err(unknown_key(other)),
    };
    store::set_setting(conn, key, &canonical)
}
