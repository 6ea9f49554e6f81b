// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Settings;
use crate::engine::cards;
use crate::ledger;
use crate::store::{self, NewCard, Store};
use crate::utils::{
    fmt_money, maybe_print_json, parse_amount, parse_date, parse_day, parse_percent,
    pretty_table, resolve_card, today,
};
use anyhow::Result;

pub fn handle(store: &Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        Some(("pay", sub)) => event(store, sub, true)?,
        Some(("interest", sub)) => event(store, sub, false)?,
        Some(("events", sub)) => events(store, sub)?,
        Some(("rm", sub)) => {
            let card = resolve_card(store.conn(), sub.get_one::<String>("card").unwrap())?;
            ledger::cards::delete_card(store, card.id)?;
            println!("Deleted card '{}'", card.title);
        }
        _ => {}
    }
    Ok(())
}

fn add(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let card = NewCard {
        title: sub.get_one::<String>("title").unwrap().to_string(),
        balance: parse_amount(sub.get_one::<String>("balance").unwrap())?,
        statement_day: parse_day(sub.get_one::<String>("statement-day").unwrap())?,
        due_day: parse_day(sub.get_one::<String>("due-day").unwrap())?,
        min_payment_rate: parse_percent(sub.get_one::<String>("min-rate").unwrap())?,
    };
    let id = ledger::cards::add_card(store, card)?;
    println!("Added card #{}", id);
    Ok(())
}

fn event(store: &Store, sub: &clap::ArgMatches, payment: bool) -> Result<()> {
    let card = resolve_card(store.conn(), sub.get_one::<String>("card").unwrap())?;
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => today(),
    };
    let note = sub.get_one::<String>("note").map(|s| s.as_str());
    let receipt = if payment {
        ledger::cards::record_payment(store, card.id, amount, date, note)?
    } else {
        ledger::cards::accrue_interest(store, card.id, amount, date, note)?
    };
    let symbol = Settings::load(store.conn())?.currency_symbol;
    println!(
        "{} {} on '{}': balance {} -> {}",
        if payment { "Paid" } else { "Interest" },
        fmt_money(&amount, &symbol),
        card.title,
        fmt_money(&receipt.update.balance_before, &symbol),
        fmt_money(&receipt.update.balance_after, &symbol)
    );
    Ok(())
}

fn list(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let today = today();
    let events = store::list_card_events(store.conn(), None)?;
    let data: Vec<cards::CardStatus> = store::list_cards(store.conn())?
        .iter()
        .map(|c| cards::status(c, &events, today))
        .collect();
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let symbol = Settings::load(store.conn())?.currency_symbol;
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|s| {
                vec![
                    s.card.id.to_string(),
                    s.card.title.clone(),
                    fmt_money(&s.card.balance, &symbol),
                    fmt_money(&s.minimum_payment, &symbol),
                    s.next_due.to_string(),
                    if s.paid_this_month { "yes" } else { "no" }.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Title", "Balance", "Minimum", "Next due", "Paid this month"],
                rows,
            )
        );
    }
    Ok(())
}

fn events(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let card_id = match sub.get_one::<String>("card") {
        Some(key) => Some(resolve_card(store.conn(), key)?.id),
        None => None,
    };
    let data = store::list_card_events(store.conn(), card_id)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|e| {
                vec![
                    e.id.to_string(),
                    e.card_id.to_string(),
                    e.date.to_string(),
                    e.kind.as_str().to_string(),
                    e.amount.to_string(),
                    e.note.clone().unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Card", "Date", "Kind", "Amount", "Note"], rows)
        );
    }
    Ok(())
}
