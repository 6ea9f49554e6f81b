// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::reconcile::{ReconcileReport, reconcile};
use crate::store::Store;
use crate::utils::pretty_table;
use anyhow::Result;

pub fn handle(store: &Store, m: &clap::ArgMatches) -> Result<()> {
    let report = reconcile(store, m.get_flag("apply"))?;
    print_report(&report);
    Ok(())
}

fn print_report(report: &ReconcileReport) {
    if report.is_clean() {
        println!("✅ doctor: no issues found");
        return;
    }
    let mut rows = Vec::new();
    for d in &report.drift {
        rows.push(vec![
            "balance_drift".into(),
            format!(
                "{} #{} '{}': stored {}, rebuilt {}",
                d.collection, d.id, d.title, d.stored, d.rebuilt
            ),
        ]);
    }
    for o in &report.orphan_mirrors {
        rows.push(vec![
            "mirror_without_source".into(),
            format!("transaction #{} -> {}:{}", o.transaction_id, o.link_kind, o.link_id),
        ]);
    }
    println!("{}", pretty_table(&["Issue", "Detail"], rows));
    if report.repaired {
        println!("Rebuilt {} balance(s) from their event logs", report.drift.len());
    } else if !report.drift.is_empty() {
        println!("Run `tallybook doctor --apply` to rebuild drifted balances");
    }
}
