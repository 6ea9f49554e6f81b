// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Classification of loosely labelled historical records.
//!
//! Older rows carry kind labels from several schema revisions (English
//! words, localized words, bare signs). Every label is mapped onto a strict
//! enum when the row is decoded; nothing past the store sees the raw text.

use crate::models::{TxKind, TaxKind};

const INCOME_LABELS: &[&str] = &["income", "доход", "+", "in"];
const EXPENSE_LABELS: &[&str] = &["expense", "расход", "-", "outcome", "spend"];

/// Unknown labels fall back to `Expense` so a bad row can never inflate income.
pub fn normalize_tx_kind(raw: &str) -> TxKind {
    let label = raw.trim().to_lowercase();
    if INCOME_LABELS.contains(&label.as_str()) {
        TxKind::Income
    } else {
        if !EXPENSE_LABELS.contains(&label.as_str()) {
            tracing::debug!(label = %raw, "unrecognized transaction kind, treating as expense");
        }
        TxKind::Expense
    }
}

pub fn normalize_tax_kind(raw: &str) -> TaxKind {
    match raw.trim().to_lowercase().as_str() {
        "flat_rate" | "flat" | "usn" => TaxKind::FlatRate,
        "fixed_levy" | "fixed" => TaxKind::FixedLevy,
        "progressive" | "extra" => TaxKind::Progressive,
        _ => TaxKind::Unallocated,
    }
}
