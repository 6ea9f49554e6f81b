// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Settings;
use crate::engine::savings::SavingsProjection;
use crate::ledger;
use crate::store::{self, ListQuery, Store};
use crate::utils::{
    fmt_money, maybe_print_json, parse_amount, parse_date, parse_month, pretty_table, today,
};
use anyhow::Result;
use rust_decimal::Decimal;

pub fn handle(store: &Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("settings", sub)) => settings(store, sub)?,
        Some(("add", sub)) => add(store, sub)?,
        Some(("add-recommended", _)) => {
            let today = today();
            let receipt = ledger::savings::add_recommended_today(store, today)?;
            let entry = store::get_savings_entry(store.conn(), receipt.entry_id)?;
            let symbol = Settings::load(store.conn())?.currency_symbol;
            println!("Saved {} on {}", fmt_money(&entry.amount, &symbol), today);
        }
        Some(("edit", sub)) => edit(store, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            ledger::savings::delete_entry(store, id)?;
            println!("Deleted savings entry {}", id);
        }
        Some(("list", sub)) => list(store, sub)?,
        Some(("status", sub)) => status(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn settings(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let current = ledger::savings::ensure_settings(store)?;
    let goal = sub.get_one::<String>("goal").map(|s| parse_amount(s)).transpose()?;
    let monthly = sub
        .get_one::<String>("monthly")
        .map(|s| parse_amount(s))
        .transpose()?;
    let s = if goal.is_some() || monthly.is_some() {
        ledger::savings::update_settings(
            store,
            goal.unwrap_or(current.goal_amount),
            monthly.unwrap_or(current.target_monthly),
        )?
    } else {
        current
    };
    println!("Goal: {}\nMonthly target: {}", s.goal_amount, s.target_monthly);
    Ok(())
}

fn add(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => today(),
    };
    let note = sub.get_one::<String>("note").map(|s| s.as_str());
    let receipt = ledger::savings::add_entry(store, date, amount, note)?;
    println!(
        "Saved #{} on {}{}",
        receipt.entry_id,
        date,
        if receipt.transaction_id.is_some() {
            " (mirrored as expense)"
        } else {
            ""
        }
    );
    Ok(())
}

fn edit(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let current = store::get_savings_entry(store.conn(), id)?;
    let amount = match sub.get_one::<String>("amount") {
        Some(a) => parse_amount(a)?,
        None => current.amount,
    };
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => current.date,
    };
    let note = sub.get_one::<String>("note").cloned().or(current.note);
    ledger::savings::edit_entry(store, id, date, amount, note.as_deref())?;
    println!("Updated savings entry {}", id);
    Ok(())
}

fn list(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let query = ListQuery {
        period: sub
            .get_one::<String>("month")
            .map(|s| parse_month(s))
            .transpose()?,
        limit: sub.get_one::<usize>("limit").copied(),
    };
    let data = store::list_savings_entries(store.conn(), &query)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|e| {
                vec![
                    e.id.to_string(),
                    e.date.to_string(),
                    e.amount.to_string(),
                    e.note.clone().unwrap_or_default(),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["ID", "Date", "Amount", "Note"], rows));
    }
    Ok(())
}

fn status(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let settings = store::latest_savings_settings(store.conn())?;
    let entries = store::list_savings_entries(store.conn(), &ListQuery::all())?;
    let p = SavingsProjection::compute(settings.as_ref(), &entries, today());
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &p)? {
        return Ok(());
    }
    let symbol = Settings::load(store.conn())?.currency_symbol;
    let m = |d: Decimal| fmt_money(&d, &symbol);
    let rows = vec![
        vec!["Goal".into(), m(p.goal)],
        vec!["Saved".into(), m(p.total_saved)],
        vec!["Progress".into(), format!("{}%", p.display_pct.round_dp(1))],
        vec!["Remaining".into(), m(p.remaining_to_goal)],
        vec![
            "Months to goal".into(),
            p.estimated_months_to_goal
                .map(|n| n.to_string())
                .unwrap_or_else(|| "-".into()),
        ],
        vec!["Saved this month".into(), m(p.saved_this_month)],
        vec!["Left this month".into(), m(p.remaining_this_month)],
        vec!["Recommended today".into(), m(p.recommended_daily)],
    ];
    println!("{}", pretty_table(&["Savings", ""], rows));
    Ok(())
}
