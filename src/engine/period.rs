// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use std::fmt;

use crate::error::{Result, invalid};
use crate::models::{CardEvent, LoanPayment, SavingsEntry, TaxPayment, Transaction, TxKind};

/// A calendar window matched by ISO date prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    Month { year: i32, month: u32 },
    Year(i32),
}

impl Period {
    pub fn month_of(date: NaiveDate) -> Period {
        Period::Month {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year_of(date: NaiveDate) -> Period {
        Period::Year(date.year())
    }

    /// Accepts `YYYY-MM` or `YYYY`.
    pub fn parse(s: &str) -> Result<Period> {
        let s = s.trim();
        match s.len() {
            4 => s
                .parse::<i32>()
                .map(Period::Year)
                .map_err(|_| invalid(format!("Invalid year '{}', expected YYYY", s))),
            7 => {
                let d = NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
                    .map_err(|_| invalid(format!("Invalid month '{}', expected YYYY-MM", s)))?;
                Ok(Period::month_of(d))
            }
            _ => Err(invalid(format!(
                "Invalid period '{}', expected YYYY-MM or YYYY",
                s
            ))),
        }
    }

    pub fn key(&self) -> String {
        match self {
            Period::Month { year, month } => format!("{:04}-{:02}", year, month),
            Period::Year(year) => format!("{:04}", year),
        }
    }

    /// Lexical prefix test against the zero-padded ISO form of `date`.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.format("%Y-%m-%d").to_string().starts_with(&self.key())
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        match *self {
            Period::Month { year, month } => NaiveDate::from_ymd_opt(year, month, 1),
            Period::Year(year) => NaiveDate::from_ymd_opt(year, 1, 1),
        }
    }

    /// The following month or year.
    pub fn next(&self) -> Period {
        match *self {
            Period::Month { year, month: 12 } => Period::Month {
                year: year + 1,
                month: 1,
            },
            Period::Month { year, month } => Period::Month {
                year,
                month: month + 1,
            },
            Period::Year(year) => Period::Year(year + 1),
        }
    }

    pub fn previous(&self) -> Period {
        match *self {
            Period::Month { year, month: 1 } => Period::Month {
                year: year - 1,
                month: 12,
            },
            Period::Month { year, month } => Period::Month {
                year,
                month: month - 1,
            },
            Period::Year(year) => Period::Year(year - 1),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

/// A money movement that can be bucketed by calendar day.
pub trait Dated {
    fn day(&self) -> Option<NaiveDate>;
    fn amount(&self) -> Decimal;
}

impl Dated for Transaction {
    fn day(&self) -> Option<NaiveDate> {
        Some(self.date)
    }
    fn amount(&self) -> Decimal {
        self.amount
    }
}

impl Dated for SavingsEntry {
    fn day(&self) -> Option<NaiveDate> {
        Some(self.date)
    }
    fn amount(&self) -> Decimal {
        self.amount
    }
}

impl Dated for TaxPayment {
    fn day(&self) -> Option<NaiveDate> {
        self.date
    }
    fn amount(&self) -> Decimal {
        self.amount
    }
}

impl Dated for LoanPayment {
    fn day(&self) -> Option<NaiveDate> {
        Some(self.payment_date)
    }
    fn amount(&self) -> Decimal {
        self.payment_amount
    }
}

impl Dated for CardEvent {
    fn day(&self) -> Option<NaiveDate> {
        Some(self.date)
    }
    fn amount(&self) -> Decimal {
        self.amount
    }
}

pub fn sum_in_period<'a, T, I>(records: I, period: &Period) -> Decimal
where
    T: Dated + 'a,
    I: IntoIterator<Item = &'a T>,
{
    records
        .into_iter()
        .filter(|r| r.day().is_some_and(|d| period.contains(d)))
        .map(|r| r.amount())
        .sum()
}

pub fn sum_all<'a, T, I>(records: I) -> Decimal
where
    T: Dated + 'a,
    I: IntoIterator<Item = &'a T>,
{
    records.into_iter().map(|r| r.amount()).sum()
}

pub fn income_in(txs: &[Transaction], period: &Period) -> Decimal {
    sum_in_period(txs.iter().filter(|t| t.kind == TxKind::Income), period)
}

pub fn expense_in(txs: &[Transaction], period: &Period) -> Decimal {
    sum_in_period(txs.iter().filter(|t| t.kind == TxKind::Expense), period)
}

/// Income flagged for the flat-rate regime. Unknown (`None`) does not count.
pub fn taxable_income_in(txs: &[Transaction], period: &Period) -> Decimal {
    sum_in_period(
        txs.iter()
            .filter(|t| t.kind == TxKind::Income && t.taxable == Some(true)),
        period,
    )
}

pub fn days_in_month(date: NaiveDate) -> u32 {
    let first = NaiveDate::from_ymd_opt(date.year(), date.month(), 1);
    let next = match date.month() {
        12 => NaiveDate::from_ymd_opt(date.year() + 1, 1, 1),
        m => NaiveDate::from_ymd_opt(date.year(), m + 1, 1),
    };
    match (first, next) {
        (Some(a), Some(b)) => (b - a).num_days() as u32,
        _ => 30,
    }
}

/// Days left in the month counting `today`; never below 1.
pub fn days_remaining_in_month(today: NaiveDate) -> u32 {
    (days_in_month(today) + 1).saturating_sub(today.day()).max(1)
}

/// Months left in the year counting the current one; never below 1.
pub fn months_remaining_in_year(today: NaiveDate) -> u32 {
    (13u32.saturating_sub(today.month())).max(1)
}

/// Whole days from `from` to `to`, clamped at zero.
pub fn whole_days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days().max(0)
}

/// The next date on or after `today` that falls on `day` (1–28).
pub fn next_day_of_month(day: u32, today: NaiveDate) -> NaiveDate {
    let day = day.clamp(1, 28);
    if today.day() <= day {
        if let Some(d) = today.with_day(day) {
            return d;
        }
    }
    let (y, m) = match today.month() {
        12 => (today.year() + 1, 1),
        m => (today.year(), m + 1),
    };
    NaiveDate::from_ymd_opt(y, m, day).unwrap_or(today)
}
