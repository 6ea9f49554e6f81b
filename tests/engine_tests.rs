// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use std::rc::Rc;
use tallybook::config;
use tallybook::engine::Engine;
use tallybook::engine::budget::BudgetPolicy;
use tallybook::ledger;
use tallybook::store::{Collection, NewLoan, Store};
use tallybook::{cli, commands::settings};

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn june_household() -> Store {
    let store = Store::open_in_memory().unwrap();
    config::set(store.conn(), config::PLANNED_INCOME, "200000").unwrap();
    ledger::tax::update_settings(&store, dec!(42000), dec!(0.01)).unwrap();
    ledger::savings::update_settings(&store, dec!(1000000), dec!(30000)).unwrap();
    ledger::loans::add_loan(
        &store,
        NewLoan {
            title: "Car".into(),
            balance: dec!(100000),
            monthly_payment: dec!(15000),
            payment_day: 15,
            annual_rate: dec!(12),
        },
    )
    .unwrap();
    ledger::recurring::add(&store, "Rent", dec!(25000), 5).unwrap();
    ledger::transactions::add_income(&store, d("2025-06-01"), dec!(150000), "Salary", true, None)
        .unwrap();
    ledger::transactions::add_expense(&store, d("2025-06-03"), dec!(30000), "Food", None).unwrap();
    ledger::savings::add_entry(&store, d("2025-06-05"), dec!(10000), None).unwrap();
    store
}

#[test]
fn dashboard_combines_every_calculator() {
    let store = june_household();
    let engine = Engine::new(&store);
    let dash = engine.dashboard(d("2025-06-10")).unwrap();

    assert_eq!(dash.month, "2025-06");
    assert_eq!(dash.income_month, dec!(150000));
    // the savings entry is mirrored as an expense
    assert_eq!(dash.expense_month, dec!(40000));
    assert_eq!(dash.tax.flat_rate_reserve_month, dec!(9000));
    assert_eq!(dash.tax.monthly_reserve, dec!(6000));
    assert_eq!(dash.loan_obligations, dec!(15000));
    assert_eq!(dash.recurring_unpaid, dec!(25000));

    let b = &dash.budget;
    assert_eq!(b.policy, BudgetPolicy::Forecast);
    assert_eq!(b.allowed_monthly_spend, dec!(140000));
    assert_eq!(b.remaining_allowed_spend, dec!(100000));
    assert_eq!(b.free_forecast, dec!(70000));

    assert_eq!(dash.loans.len(), 1);
    assert!(!dash.loans[0].paid_this_month);
    assert_eq!(dash.loans[0].next_due, d("2025-06-15"));

    let cash = engine
        .dashboard_with(d("2025-06-10"), BudgetPolicy::CashPosition)
        .unwrap();
    assert_eq!(cash.budget.cash_on_hand, dec!(110000));
    assert_eq!(cash.budget.remaining_allowed_spend, dec!(90000));
}

#[test]
fn dashboard_is_memoized_until_a_write() {
    let store = june_household();
    let engine = Engine::new(&store);
    let today = d("2025-06-10");

    let a = engine.dashboard(today).unwrap();
    let b = engine.dashboard(today).unwrap();
    assert!(Rc::ptr_eq(&a, &b));
    let version = engine.snapshot().unwrap().version;

    let other_day = engine.dashboard(d("2025-06-11")).unwrap();
    assert!(!Rc::ptr_eq(&a, &other_day));
    assert_eq!(engine.snapshot().unwrap().version, version);

    ledger::transactions::add_expense(&store, d("2025-06-10"), dec!(500), "Taxi", None).unwrap();
    let c = engine.dashboard(today).unwrap();
    assert!(!Rc::ptr_eq(&a, &c));
    assert_eq!(c.expense_month, a.expense_month + dec!(500));
    assert_eq!(engine.snapshot().unwrap().version, version + 1);
}

#[test]
fn reload_touches_only_dirty_collections() {
    let store = june_household();
    let engine = Engine::new(&store);
    let before = engine.snapshot().unwrap();
    assert!(Rc::ptr_eq(&before, &engine.snapshot().unwrap()));

    ledger::cards::add_card(
        &store,
        tallybook::store::NewCard {
            title: "Visa".into(),
            balance: dec!(1000),
            statement_day: 1,
            due_day: 20,
            min_payment_rate: dec!(0.1),
        },
    )
    .unwrap();
    let after = engine.snapshot().unwrap();
    assert_eq!(after.cards.len(), 1);
    assert_eq!(after.transactions.len(), before.transactions.len());
    assert!(before.cards.is_empty());
}

#[test]
fn settings_change_switches_policy() {
    let store = june_household();
    let engine = Engine::new(&store);
    let today = d("2025-06-10");
    assert_eq!(engine.dashboard(today).unwrap().budget.policy, BudgetPolicy::Forecast);

    let matches =
        cli::build_cli().get_matches_from(["tallybook", "config", "set", "budget_policy", "cash"]);
    if let Some(("config", m)) = matches.subcommand() {
        settings::handle(&store, m).unwrap();
    } else {
        panic!("no config subcommand");
    }
    assert_eq!(
        engine.dashboard(today).unwrap().budget.policy,
        BudgetPolicy::CashPosition
    );
}

#[test]
fn subscribers_hear_only_committed_writes() {
    let store = Store::open_in_memory().unwrap();
    let heard = Rc::new(std::cell::RefCell::new(Vec::new()));
    let h = Rc::clone(&heard);
    store.subscribe(Collection::Transactions, move |c| h.borrow_mut().push(c));

    assert!(ledger::transactions::add_expense(&store, d("2025-06-10"), dec!(0), "", None).is_err());
    assert!(ledger::loans::record_payment(&store, 5, dec!(10), d("2025-06-10")).is_err());
    assert!(heard.borrow().is_empty());

    ledger::transactions::add_expense(&store, d("2025-06-10"), dec!(1), "", None).unwrap();
    assert_eq!(*heard.borrow(), vec![Collection::Transactions]);
}
