// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Settings;
use crate::engine::period::Period;
use crate::ledger;
use crate::store::{self, Store};
use crate::utils::{fmt_money, maybe_print_json, parse_month, pretty_table, today};
use anyhow::Result;

pub fn handle(store: &Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("close", sub)) => {
            let month = match sub.get_one::<String>("month") {
                Some(s) => parse_month(s)?,
                None => Period::month_of(today()).previous(),
            };
            let close = ledger::carryover::close_month(store, month)?;
            let symbol = Settings::load(store.conn())?.currency_symbol;
            println!(
                "Closed {}: {} + {} - {} = {} carried into {}",
                close.month,
                fmt_money(&close.carry_in, &symbol),
                fmt_money(&close.income, &symbol),
                fmt_money(&close.expense, &symbol),
                fmt_money(&close.closing, &symbol),
                close.next_month
            );
        }
        Some(("list", sub)) => {
            let data = store::list_carryovers(store.conn())?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows: Vec<Vec<String>> = data
                    .iter()
                    .map(|c| vec![c.month.clone(), c.carry_in.to_string()])
                    .collect();
                println!("{}", pretty_table(&["Month", "Carry in"], rows));
            }
        }
        _ => {}
    }
    Ok(())
}
