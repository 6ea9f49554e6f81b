// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! User-facing mutations.
//!
//! Every function validates its input before touching the store and runs
//! all of its writes through [`Store::write`](crate::store::Store::write),
//! so an obligation event, its balance change and its mirrored expense are
//! committed together or not at all.

pub mod cards;
pub mod carryover;
pub mod loans;
pub mod reconcile;
pub mod recurring;
pub mod savings;
pub mod tax;
pub mod transactions;

use rust_decimal::Decimal;

use crate::error::{Result, invalid};

/// Largest amount accepted anywhere in the ledger.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000;

fn require_bounded(amount: Decimal, what: &str) -> Result<()> {
    if amount > Decimal::from(MAX_AMOUNT) {
        return Err(invalid(format!("{} must not exceed {}", what, MAX_AMOUNT)));
    }
    Ok(())
}

pub(crate) fn require_positive(amount: Decimal, what: &str) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(invalid(format!("{} must be greater than 0", what)));
    }
    require_bounded(amount, what)
}

pub(crate) fn require_non_negative(amount: Decimal, what: &str) -> Result<()> {
    if amount < Decimal::ZERO {
        return Err(invalid(format!("{} must not be negative", what)));
    }
    require_bounded(amount, what)
}

pub(crate) fn require_day(day: u32, what: &str) -> Result<()> {
    if !(1..=28).contains(&day) {
        return Err(invalid(format!("{} must be between 1 and 28", what)));
    }
    Ok(())
}

pub(crate) fn require_range(value: Decimal, lo: Decimal, hi: Decimal, what: &str) -> Result<()> {
    if value < lo || value > hi {
        return Err(invalid(format!("{} must be between {} and {}", what, lo, hi)));
    }
    Ok(())
}

pub(crate) fn require_title(title: &str) -> Result<String> {
    let t = title.trim();
    if t.is_empty() {
        return Err(invalid("title must not be empty"));
    }
    Ok(t.to_string())
}
