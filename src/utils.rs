// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::Connection;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::engine::period::Period;
use crate::models::{CardAccount, Loan};
use crate::store;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_month(s: &str) -> Result<Period> {
    match Period::parse(s)? {
        p @ Period::Month { .. } => Ok(p),
        Period::Year(_) => Err(anyhow!("Invalid month '{}', expected YYYY-MM", s)),
    }
}

pub fn parse_period(s: &str) -> Result<Period> {
    Ok(Period::parse(s)?)
}

/// Parses user-typed money: stray whitespace is dropped and the first comma
/// is read as the decimal separator, so `"1 234,50"` is `1234.50`.
pub fn parse_amount(s: &str) -> Result<Decimal> {
    let compact = WHITESPACE.replace_all(s, "");
    let normalized = compact.replacen(',', ".", 1);
    normalized
        .parse::<Decimal>()
        .with_context(|| format!("Invalid amount '{}'", s))
}

pub fn parse_day(s: &str) -> Result<u32> {
    s.trim()
        .parse::<u32>()
        .with_context(|| format!("Invalid day of month '{}'", s))
}

/// Rate typed as a percent (`5` for 5%) returned as a fraction.
pub fn parse_percent(s: &str) -> Result<Decimal> {
    Ok(parse_amount(s)? / Decimal::ONE_HUNDRED)
}

/// Whole units with space-grouped thousands, e.g. `-1 234 567 ₽`.
pub fn fmt_money(d: &Decimal, symbol: &str) -> String {
    let rounded = d.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let digits = rounded.abs().trunc().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    if symbol.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{} {}", sign, grouped, symbol)
    }
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

/// Accepts a numeric id or an exact title.
pub fn resolve_loan(conn: &Connection, key: &str) -> Result<Loan> {
    if let Ok(id) = key.trim().parse::<i64>() {
        return Ok(store::get_loan(conn, id)?);
    }
    store::find_loan_by_title(conn, key.trim())?
        .with_context(|| format!("Loan '{}' not found", key))
}

pub fn resolve_card(conn: &Connection, key: &str) -> Result<CardAccount> {
    if let Ok(id) = key.trim().parse::<i64>() {
        return Ok(store::get_card(conn, id)?);
    }
    store::find_card_by_title(conn, key.trim())?
        .with_context(|| format!("Card '{}' not found", key))
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
