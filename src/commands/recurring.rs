// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Settings;
use crate::engine::period::Period;
use crate::engine::recurring;
use crate::ledger;
use crate::store::{self, Store};
use crate::utils::{
    fmt_money, maybe_print_json, parse_amount, parse_date, parse_day, parse_month, pretty_table,
    today,
};
use anyhow::Result;

pub fn handle(store: &Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let title = sub.get_one::<String>("title").unwrap();
            let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
            let day = parse_day(sub.get_one::<String>("day").unwrap())?;
            let id = ledger::recurring::add(store, title, amount, day)?;
            println!("Added recurring obligation #{}", id);
        }
        Some(("list", sub)) => list(store, sub)?,
        Some(("pay", sub)) => pay(store, sub)?,
        Some(("deactivate", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            ledger::recurring::deactivate(store, id)?;
            println!("Deactivated recurring obligation {}", id);
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            ledger::recurring::delete(store, id)?;
            println!("Deleted recurring obligation {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn pay(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => today(),
    };
    let month = match sub.get_one::<String>("month") {
        Some(m) => parse_month(m)?,
        None => Period::month_of(date),
    };
    let amount = sub
        .get_one::<String>("amount")
        .map(|s| parse_amount(s))
        .transpose()?;
    let receipt = ledger::recurring::mark_paid(store, id, month, date, amount)?;
    println!(
        "Marked obligation {} paid for {} (transaction #{})",
        id, month, receipt.transaction_id
    );
    Ok(())
}

fn list(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let obligations = store::list_recurring(store.conn())?;
    let today = today();
    let month = Period::month_of(today).key();
    let payments = store::list_recurring_payments(store.conn(), Some(&month))?;
    let statuses = recurring::statuses(&obligations, &payments, today);
    if !maybe_print_json(json_flag, jsonl_flag, &statuses)? {
        let symbol = Settings::load(store.conn())?.currency_symbol;
        let rows: Vec<Vec<String>> = statuses
            .iter()
            .map(|s| {
                vec![
                    s.obligation.id.to_string(),
                    s.obligation.title.clone(),
                    fmt_money(&s.obligation.amount, &symbol),
                    s.next_due.to_string(),
                    match &s.payment {
                        Some(p) => format!("paid {}", p.paid_date),
                        None => "unpaid".into(),
                    },
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Title", "Amount", "Next due", month.as_str()], rows)
        );
        println!(
            "Unpaid this month: {}",
            fmt_money(&recurring::unpaid_total(&statuses), &symbol)
        );
    }
    Ok(())
}
