// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store::{self, ListQuery, Store};
use crate::utils::parse_period;
use anyhow::{Result, bail};
use serde_json::json;

pub fn handle(store: &Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(store, sub),
        _ => Ok(()),
    }
}

fn export_transactions(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    if fmt != "csv" && fmt != "json" {
        bail!("Unknown format: {} (use csv|json)", fmt);
    }
    let query = ListQuery {
        period: sub
            .get_one::<String>("month")
            .map(|s| parse_period(s))
            .transpose()?,
        limit: None,
    };
    // oldest first
    let mut txs = store::list_transactions(store.conn(), &query)?;
    txs.reverse();

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "date", "kind", "amount", "category", "taxable", "note", "link",
            ])?;
            for t in &txs {
                wtr.write_record([
                    t.date.to_string(),
                    t.kind.as_str().to_string(),
                    t.amount.to_string(),
                    t.category.clone(),
                    t.taxable.map(|b| b.to_string()).unwrap_or_default(),
                    t.note.clone().unwrap_or_default(),
                    t.link
                        .map(|l| format!("{}:{}", l.kind.as_str(), l.id))
                        .unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        _ => {
            let items: Vec<_> = txs
                .iter()
                .map(|t| {
                    json!({
                        "date": t.date.to_string(),
                        "kind": t.kind.as_str(),
                        "amount": t.amount.to_string(),
                        "category": t.category,
                        "taxable": t.taxable,
                        "note": t.note,
                        "link": t.link.map(|l| format!("{}:{}", l.kind.as_str(), l.id)),
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
    }
    println!("Exported {} transactions to {}", txs.len(), out);
    Ok(())
}
