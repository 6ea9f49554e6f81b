// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::Engine;
use crate::engine::budget::BudgetPolicy;
use crate::store::Store;
use crate::utils::{fmt_money, maybe_print_json, parse_date, pretty_table, today};
use anyhow::Result;
use rust_decimal::Decimal;

pub fn handle(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let today = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => today(),
    };
    let engine = Engine::new(store);
    let dash = match sub.get_one::<String>("policy") {
        Some(p) => engine.dashboard_with(today, BudgetPolicy::parse(p)?)?,
        None => engine.dashboard(today)?,
    };
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &*dash)? {
        return Ok(());
    }

    let symbol = engine.snapshot()?.settings.currency_symbol.clone();
    let m = |d: Decimal| fmt_money(&d, &symbol);
    let b = &dash.budget;
    let rows = vec![
        vec!["Income".into(), m(dash.income_month)],
        vec!["Expense".into(), m(dash.expense_month)],
        vec!["Carry in".into(), m(dash.carry_in)],
        vec!["Free now".into(), m(b.free_now)],
        vec!["Free after reserves".into(), m(b.free_forecast)],
        vec!["Flat-rate tax reserve".into(), m(dash.tax.flat_rate_reserve_month)],
        vec!["Tax monthly reserve".into(), m(dash.tax.monthly_reserve)],
        vec!["Loan payments".into(), m(dash.loan_obligations)],
        vec!["Recurring unpaid".into(), m(dash.recurring_unpaid)],
        vec!["Saved this month".into(), m(dash.savings.saved_this_month)],
        vec!["Allowed this month".into(), m(b.allowed_monthly_spend)],
        vec!["Average daily limit".into(), m(b.average_daily_limit)],
        vec!["Remaining to spend".into(), m(b.remaining_allowed_spend)],
        vec![
            format!("Daily limit ({} days left)", b.days_remaining),
            m(b.daily_limit_from_today),
        ],
        vec!["Recommended saving today".into(), m(dash.savings.recommended_daily)],
    ];
    let title = format!("{} ({})", dash.month, b.policy);
    println!("{}", pretty_table(&[title.as_str(), ""], rows));

    let due: Vec<Vec<String>> = dash
        .loans
        .iter()
        .filter(|l| l.loan.active && !l.paid_this_month)
        .map(|l| vec![l.loan.title.clone(), l.next_due.to_string(), m(l.loan.monthly_payment)])
        .chain(
            dash.cards
                .iter()
                .filter(|c| c.card.active && !c.paid_this_month)
                .map(|c| vec![c.card.title.clone(), c.next_due.to_string(), m(c.minimum_payment)]),
        )
        .chain(
            dash.recurring
                .iter()
                .filter(|r| !r.is_paid())
                .map(|r| {
                    vec![
                        r.obligation.title.clone(),
                        r.next_due.to_string(),
                        m(r.obligation.amount),
                    ]
                }),
        )
        .collect();
    if !due.is_empty() {
        println!("{}", pretty_table(&["Due", "Date", "Amount"], due));
    }
    Ok(())
}
