// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use tallybook::engine::normalize::{normalize_tax_kind, normalize_tx_kind};
use tallybook::models::{TaxKind, TxKind};

#[test]
fn income_labels_are_recognized() {
    for raw in ["income", "INCOME", " Income ", "доход", "Доход", "+", "in"] {
        assert_eq!(normalize_tx_kind(raw), TxKind::Income, "label {:?}", raw);
    }
}

#[test]
fn everything_else_is_an_expense() {
    for raw in ["expense", "РАСХОД", "-", "outcome", "spend", "", "   ", "refund", "😀"] {
        assert_eq!(normalize_tx_kind(raw), TxKind::Expense, "label {:?}", raw);
    }
}

#[test]
fn tax_kind_aliases() {
    assert_eq!(normalize_tax_kind("usn"), TaxKind::FlatRate);
    assert_eq!(normalize_tax_kind("Flat_Rate"), TaxKind::FlatRate);
    assert_eq!(normalize_tax_kind("fixed"), TaxKind::FixedLevy);
    assert_eq!(normalize_tax_kind("extra"), TaxKind::Progressive);
    assert_eq!(normalize_tax_kind("any"), TaxKind::Unallocated);
    assert_eq!(normalize_tax_kind(""), TaxKind::Unallocated);
}
