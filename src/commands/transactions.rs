// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Settings;
use crate::engine::normalize::normalize_tx_kind;
use crate::ledger;
use crate::models::{TransactionPatch, TxKind};
use crate::store::{self, ListQuery, Store};
use crate::utils::{fmt_money, maybe_print_json, parse_amount, parse_date, parse_period, pretty_table, today};
use anyhow::Result;
use serde::Serialize;

pub fn handle(store: &Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add-income", sub)) => add(store, sub, TxKind::Income)?,
        Some(("add-expense", sub)) => add(store, sub, TxKind::Expense)?,
        Some(("list", sub)) => list(store, sub)?,
        Some(("edit", sub)) => edit(store, sub)?,
        Some(("categories", sub)) => {
            let kind = normalize_tx_kind(sub.get_one::<String>("kind").unwrap());
            for c in store::categories(store.conn(), kind)? {
                println!("{}", c);
            }
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            ledger::transactions::delete(store, id)?;
            println!("Deleted transaction {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn add(store: &Store, sub: &clap::ArgMatches, kind: TxKind) -> Result<()> {
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => today(),
    };
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
    let category = sub
        .get_one::<String>("category")
        .map(|s| s.as_str())
        .unwrap_or("");
    let note = sub.get_one::<String>("note").cloned();

    let id = match kind {
        TxKind::Income => {
            let taxable = !sub.get_flag("not-taxable");
            ledger::transactions::add_income(store, date, amount, category, taxable, note)?
        }
        TxKind::Expense => ledger::transactions::add_expense(store, date, amount, category, note)?,
    };
    let symbol = Settings::load(store.conn())?.currency_symbol;
    println!(
        "Recorded {} #{}: {} on {}",
        kind.as_str(),
        id,
        fmt_money(&amount, &symbol),
        date
    );
    Ok(())
}

fn edit(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let patch = TransactionPatch {
        date: sub.get_one::<String>("date").map(|s| parse_date(s)).transpose()?,
        amount: sub
            .get_one::<String>("amount")
            .map(|s| parse_amount(s))
            .transpose()?,
        category: sub.get_one::<String>("category").cloned(),
        note: sub.get_one::<String>("note").map(|s| Some(s.clone())),
        taxable: sub.get_one::<bool>("taxable").copied(),
    };
    ledger::transactions::edit(store, id, &patch)?;
    println!("Updated transaction {}", id);
    Ok(())
}

fn list(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(store, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.kind.clone(),
                    r.amount.clone(),
                    r.category.clone(),
                    r.taxable.clone(),
                    r.note.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Kind", "Amount", "Category", "Taxable", "Note"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub kind: String,
    pub amount: String,
    pub category: String,
    pub taxable: String,
    pub note: String,
    pub link: Option<String>,
}

pub fn query_rows(store: &Store, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let query = ListQuery {
        period: sub
            .get_one::<String>("month")
            .map(|s| parse_period(s))
            .transpose()?,
        limit: sub.get_one::<usize>("limit").copied(),
    };
    let txs = store::list_transactions(store.conn(), &query)?;
    Ok(txs
        .into_iter()
        .map(|t| TransactionRow {
            id: t.id,
            date: t.date.to_string(),
            kind: t.kind.as_str().to_string(),
            amount: t.amount.to_string(),
            category: t.category,
            taxable: match t.taxable {
                Some(true) => "yes".into(),
                Some(false) => "no".into(),
                None => String::new(),
            },
            note: t.note.unwrap_or_default(),
            link: t.link.map(|l| format!("{}:{}", l.kind.as_str(), l.id)),
        })
        .collect())
}
