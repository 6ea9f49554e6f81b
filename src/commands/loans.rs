// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Settings;
use crate::engine::loans;
use crate::ledger;
use crate::store::{self, NewLoan, Store};
use crate::utils::{
    fmt_money, maybe_print_json, parse_amount, parse_date, parse_day, pretty_table,
    resolve_loan, today,
};
use anyhow::Result;

pub fn handle(store: &Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        Some(("pay", sub)) => pay(store, sub)?,
        Some(("payments", sub)) => payments(store, sub)?,
        Some(("rm", sub)) => {
            let loan = resolve_loan(store.conn(), sub.get_one::<String>("loan").unwrap())?;
            ledger::loans::delete_loan(store, loan.id)?;
            println!("Deleted loan '{}'", loan.title);
        }
        _ => {}
    }
    Ok(())
}

fn add(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let loan = NewLoan {
        title: sub.get_one::<String>("title").unwrap().to_string(),
        balance: parse_amount(sub.get_one::<String>("balance").unwrap())?,
        monthly_payment: parse_amount(sub.get_one::<String>("monthly").unwrap())?,
        payment_day: parse_day(sub.get_one::<String>("day").unwrap())?,
        annual_rate: parse_amount(sub.get_one::<String>("rate").unwrap())?,
    };
    let id = ledger::loans::add_loan(store, loan)?;
    println!("Added loan #{}", id);
    Ok(())
}

fn pay(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let loan = resolve_loan(store.conn(), sub.get_one::<String>("loan").unwrap())?;
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => today(),
    };
    let receipt = ledger::loans::record_payment(store, loan.id, amount, date)?;
    let symbol = Settings::load(store.conn())?.currency_symbol;
    let am = &receipt.amortization;
    println!(
        "Paid {} on '{}' ({} days): interest {}, principal {}, balance {} -> {}",
        fmt_money(&amount, &symbol),
        loan.title,
        am.days,
        am.interest,
        am.principal,
        am.balance_before,
        am.balance_after
    );
    if !am.active {
        println!("Loan '{}' is paid off", loan.title);
    }
    Ok(())
}

fn list(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let today = today();
    let all = store::list_loans(store.conn())?;
    let payments = store::list_loan_payments(store.conn(), None)?;
    let data: Vec<loans::LoanStatus> = all
        .iter()
        .map(|l| loans::status(l, &payments, today))
        .collect();
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let symbol = Settings::load(store.conn())?.currency_symbol;
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|s| {
                vec![
                    s.loan.id.to_string(),
                    s.loan.title.clone(),
                    fmt_money(&s.loan.balance, &symbol),
                    fmt_money(&s.loan.monthly_payment, &symbol),
                    format!("{}%", s.loan.annual_rate),
                    s.next_due.to_string(),
                    if s.paid_this_month { "yes" } else { "no" }.to_string(),
                    if s.loan.active { "active" } else { "closed" }.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Title", "Balance", "Monthly", "Rate", "Next due", "Paid this month", "Status"],
                rows,
            )
        );
    }
    Ok(())
}

fn payments(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let loan_id = match sub.get_one::<String>("loan") {
        Some(key) => Some(resolve_loan(store.conn(), key)?.id),
        None => None,
    };
    let data = store::list_loan_payments(store.conn(), loan_id)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|p| {
                vec![
                    p.id.to_string(),
                    p.loan_id.to_string(),
                    p.payment_date.to_string(),
                    p.payment_amount.to_string(),
                    p.interest_amount.to_string(),
                    p.principal_amount.to_string(),
                    p.balance_after.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Loan", "Date", "Paid", "Interest", "Principal", "Balance after"],
                rows,
            )
        );
    }
    Ok(())
}
