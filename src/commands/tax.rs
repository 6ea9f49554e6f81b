// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Settings;
use crate::engine::normalize::normalize_tax_kind;
use crate::engine::period::Period;
use crate::engine::tax::TaxReport;
use crate::ledger;
use crate::models::TaxKind;
use crate::store::{self, ListQuery, Store};
use crate::utils::{
    fmt_money, maybe_print_json, parse_amount, parse_date, parse_percent, parse_period,
    pretty_table, today,
};
use anyhow::{Result, bail};
use rust_decimal::Decimal;

pub fn handle(store: &Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("settings", sub)) => settings(store, sub)?,
        Some(("pay", sub)) => pay(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        Some(("status", sub)) => status(store, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            ledger::tax::delete_payment(store, id)?;
            println!("Deleted tax payment {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn settings(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let current = ledger::tax::ensure_settings(store)?;
    let fixed = sub.get_one::<String>("fixed").map(|s| parse_amount(s)).transpose()?;
    let rate = sub
        .get_one::<String>("extra-rate")
        .map(|s| parse_percent(s))
        .transpose()?;
    let s = if fixed.is_some() || rate.is_some() {
        ledger::tax::update_settings(
            store,
            fixed.unwrap_or(current.annual_fixed_levy),
            rate.unwrap_or(current.extra_rate),
        )?
    } else {
        current
    };
    println!(
        "Annual fixed levy: {}\nProgressive rate: {}%",
        s.annual_fixed_levy,
        s.extra_rate * Decimal::ONE_HUNDRED
    );
    Ok(())
}

fn parse_kind(raw: &str) -> Result<TaxKind> {
    let kind = normalize_tax_kind(raw);
    if kind == TaxKind::Unallocated && !raw.trim().eq_ignore_ascii_case("unallocated") {
        bail!(
            "Unknown tax kind '{}' (use flat_rate|fixed_levy|progressive|unallocated)",
            raw
        );
    }
    Ok(kind)
}

fn pay(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let kind = parse_kind(sub.get_one::<String>("kind").unwrap())?;
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
    let date = if sub.get_flag("undated") {
        None
    } else {
        Some(match sub.get_one::<String>("date") {
            Some(d) => parse_date(d)?,
            None => today(),
        })
    };
    let note = sub.get_one::<String>("note").map(|s| s.as_str());
    let receipt = ledger::tax::record_payment(store, date, kind, amount, note)?;
    println!(
        "Recorded {} tax payment #{} of {}",
        kind.as_str(),
        receipt.payment_id,
        amount
    );
    Ok(())
}

fn list(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let query = match sub.get_one::<String>("year") {
        Some(y) => ListQuery::period(parse_period(y)?),
        None => ListQuery::all(),
    };
    let data = store::list_tax_payments(store.conn(), &query)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|p| {
                vec![
                    p.id.to_string(),
                    p.date.map(|d| d.to_string()).unwrap_or_else(|| "-".into()),
                    p.kind.as_str().to_string(),
                    p.amount.to_string(),
                    p.note.clone().unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Date", "Kind", "Amount", "Note"], rows)
        );
    }
    Ok(())
}

fn status(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let today = today();
    let settings = store::latest_tax_settings(store.conn())?;
    let txs = store::list_transactions(store.conn(), &ListQuery::period(Period::year_of(today)))?;
    let payments = store::list_tax_payments(store.conn(), &ListQuery::all())?;
    let report = TaxReport::compute(settings.as_ref(), &txs, &payments, today);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        return Ok(());
    }
    let symbol = Settings::load(store.conn())?.currency_symbol;
    let m = |d: Decimal| fmt_money(&d, &symbol);
    let rows = vec![
        vec!["Taxable income (year)".into(), m(report.annual_taxable_income)],
        vec!["Taxable income (month)".into(), m(report.month_taxable_income)],
        vec!["Flat-rate reserve (month)".into(), m(report.flat_rate_reserve_month)],
        vec!["Flat-rate remaining".into(), m(report.flat_rate_remaining)],
        vec!["Fixed levy remaining".into(), m(report.fixed_levy_remaining)],
        vec!["Progressive due".into(), m(report.progressive_due)],
        vec!["Progressive remaining".into(), m(report.progressive_remaining)],
        vec!["Unallocated paid".into(), m(report.unallocated_paid)],
        vec!["Contributions remaining".into(), m(report.contributions_remaining)],
        vec!["Months remaining".into(), report.months_remaining.to_string()],
        vec!["Monthly reserve".into(), m(report.monthly_reserve)],
    ];
    let year = report.year.to_string();
    println!("{}", pretty_table(&["Tax", year.as_str()], rows));
    Ok(())
}
