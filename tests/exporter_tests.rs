// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use serde_json::json;
use tallybook::ledger;
use tallybook::models::TaxKind;
use tallybook::store::Store;
use tallybook::{cli, commands::exporter};
use tempfile::tempdir;

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn run_export(store: &Store, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["tallybook", "export", "transactions"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(store, export_m)
    } else {
        panic!("no export subcommand");
    }
}

#[test]
fn export_transactions_streams_pretty_json() {
    let store = Store::open_in_memory().unwrap();
    ledger::transactions::add_expense(
        &store,
        d("2025-01-02"),
        dec!(12.34),
        "Groceries",
        Some("Weekly run".into()),
    )
    .unwrap();

    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.json");
    let out_str = out_path.to_string_lossy().to_string();
    run_export(&store, &["--format", "json", "--out", &out_str]).unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(
        parsed,
        json!([
            {
                "date": "2025-01-02",
                "kind": "expense",
                "amount": "12.34",
                "category": "Groceries",
                "taxable": null,
                "note": "Weekly run",
                "link": null
            }
        ])
    );
}

#[test]
fn csv_export_is_oldest_first_with_links() {
    let store = Store::open_in_memory().unwrap();
    ledger::transactions::add_income(&store, d("2025-02-01"), dec!(1000), "Salary", true, None)
        .unwrap();
    ledger::tax::record_payment(&store, Some(d("2025-02-05")), TaxKind::FlatRate, dec!(60), None)
        .unwrap();
    ledger::transactions::add_expense(&store, d("2025-03-01"), dec!(5), "Coffee", None).unwrap();

    let dir = tempdir().unwrap();
    let out_path = dir.path().join("feb.csv");
    let out_str = out_path.to_string_lossy().to_string();
    run_export(&store, &["--out", &out_str, "--month", "2025-02"]).unwrap();

    let mut rdr = csv::Reader::from_path(&out_path).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["date", "kind", "amount", "category", "taxable", "note", "link"]
    );
    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][1], "income");
    assert_eq!(&rows[0][4], "true");
    assert_eq!(&rows[1][3], "Taxes (flat_rate)");
    assert_eq!(&rows[1][6], "tax_payment:1");
}

#[test]
fn export_transactions_rejects_unknown_format() {
    let store = Store::open_in_memory().unwrap();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.unknown");
    let out_str = out_path.to_string_lossy().to_string();
    assert!(run_export(&store, &["--format", "xml", "--out", &out_str]).is_err());
    assert!(!out_path.exists());
}
