// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Annual tax obligations smoothed into a monthly planning reserve.
//!
//! Three obligations are tracked per calendar year:
//! * a flat-rate tax on taxable income (`FLAT_RATE`),
//! * a fixed annual levy from [`TaxSettings`],
//! * a progressive surcharge of `extra_rate` on taxable income above
//!   `PROGRESSIVE_THRESHOLD`.
//!
//! Payments are manual; the reserve only says how much to set aside per
//! remaining month for what is still unpaid.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use super::period::{Period, months_remaining_in_year, sum_in_period, taxable_income_in};
use crate::models::{TaxKind, TaxPayment, TaxSettings, Transaction};

/// 6%
pub const FLAT_RATE: Decimal = Decimal::from_parts(6, 0, 0, false, 2);
pub const PROGRESSIVE_THRESHOLD: Decimal = Decimal::from_parts(300_000, 0, 0, false, 0);
/// 1%, used when no settings row exists yet.
pub const DEFAULT_EXTRA_RATE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaxReport {
    pub year: i32,
    pub annual_taxable_income: Decimal,
    pub month_taxable_income: Decimal,

    pub flat_rate_due: Decimal,
    pub flat_rate_paid: Decimal,
    pub flat_rate_remaining: Decimal,
    pub flat_rate_reserve_month: Decimal,

    pub progressive_base: Decimal,
    pub progressive_due: Decimal,
    pub progressive_paid: Decimal,
    pub progressive_remaining: Decimal,

    pub fixed_levy_due: Decimal,
    pub fixed_levy_paid: Decimal,
    pub fixed_levy_remaining: Decimal,

    pub unallocated_paid: Decimal,
    pub contributions_remaining: Decimal,
    pub months_remaining: u32,
    pub monthly_reserve: Decimal,
}

pub fn progressive_due(annual_taxable_income: Decimal, extra_rate: Decimal) -> (Decimal, Decimal) {
    let base = (annual_taxable_income - PROGRESSIVE_THRESHOLD).max(Decimal::ZERO);
    (base, base * extra_rate)
}

fn paid(payments: &[TaxPayment], kind: TaxKind, year: &Period) -> Decimal {
    sum_in_period(payments.iter().filter(|p| p.kind == kind), year)
}

impl TaxReport {
    pub fn compute(
        settings: Option<&TaxSettings>,
        transactions: &[Transaction],
        payments: &[TaxPayment],
        today: NaiveDate,
    ) -> TaxReport {
        let year = Period::year_of(today);
        let month = Period::month_of(today);
        let fixed_levy_due = settings
            .map(|s| s.annual_fixed_levy)
            .unwrap_or(Decimal::ZERO);
        let extra_rate = settings.map(|s| s.extra_rate).unwrap_or(DEFAULT_EXTRA_RATE);

        let annual_taxable_income = taxable_income_in(transactions, &year);
        let month_taxable_income = taxable_income_in(transactions, &month);

        let flat_rate_due = annual_taxable_income * FLAT_RATE;
        let (progressive_base, progressive_due) = progressive_due(annual_taxable_income, extra_rate);

        let flat_rate_paid = paid(payments, TaxKind::FlatRate, &year);
        let progressive_paid = paid(payments, TaxKind::Progressive, &year);
        let fixed_levy_paid = paid(payments, TaxKind::FixedLevy, &year);
        let unallocated_paid = paid(payments, TaxKind::Unallocated, &year);

        let contributions_remaining = (fixed_levy_due + progressive_due
            - fixed_levy_paid
            - progressive_paid
            - unallocated_paid)
            .max(Decimal::ZERO);
        let months_remaining = months_remaining_in_year(today);

        TaxReport {
            year: today.year(),
            annual_taxable_income,
            month_taxable_income,
            flat_rate_due,
            flat_rate_paid,
            flat_rate_remaining: (flat_rate_due - flat_rate_paid).max(Decimal::ZERO),
            flat_rate_reserve_month: month_taxable_income * FLAT_RATE,
            progressive_base,
            progressive_due,
            progressive_paid,
            progressive_remaining: (progressive_due - progressive_paid).max(Decimal::ZERO),
            fixed_levy_due,
            fixed_levy_paid,
            fixed_levy_remaining: (fixed_levy_due - fixed_levy_paid).max(Decimal::ZERO),
            unallocated_paid,
            contributions_remaining,
            months_remaining,
            monthly_reserve: contributions_remaining / Decimal::from(months_remaining),
        }
    }
}
