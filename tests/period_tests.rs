// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tallybook::engine::period::{
    Period, days_in_month, days_remaining_in_month, expense_in, income_in,
    months_remaining_in_year, next_day_of_month, sum_in_period, taxable_income_in,
};
use tallybook::ledger;
use tallybook::store::{self, ListQuery, Store};

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn seeded() -> Store {
    let store = Store::open_in_memory().unwrap();
    let t = &store;
    ledger::transactions::add_income(t, d("2025-01-05"), dec!(1000), "Salary", true, None).unwrap();
    ledger::transactions::add_income(t, d("2025-01-20"), dec!(200), "Gift", false, None).unwrap();
    ledger::transactions::add_expense(t, d("2025-01-31"), dec!(150.50), "Food", None).unwrap();
    ledger::transactions::add_income(t, d("2025-02-01"), dec!(700), "Salary", true, None).unwrap();
    ledger::transactions::add_expense(t, d("2025-02-14"), dec!(49.50), "Flowers", None).unwrap();
    ledger::transactions::add_expense(t, d("2024-12-31"), dec!(999), "Party", None).unwrap();
    store
}

#[test]
fn month_totals_are_additive() {
    let store = seeded();
    let txs = store::list_transactions(store.conn(), &ListQuery::all()).unwrap();
    let jan = Period::parse("2025-01").unwrap();
    let feb = Period::parse("2025-02").unwrap();

    let jan_feb: Vec<_> = txs
        .iter()
        .filter(|t| jan.contains(t.date) || feb.contains(t.date))
        .cloned()
        .collect();
    assert_eq!(
        sum_in_period(&txs, &jan) + sum_in_period(&txs, &feb),
        jan_feb.iter().map(|t| t.amount).sum::<Decimal>()
    );
    assert_eq!(
        income_in(&txs, &jan) + income_in(&txs, &feb),
        income_in(&txs, &Period::Year(2025))
    );
    assert_eq!(income_in(&txs, &jan), dec!(1200));
    assert_eq!(expense_in(&txs, &jan), dec!(150.50));
    assert_eq!(taxable_income_in(&txs, &jan), dec!(1000));
    assert_eq!(expense_in(&txs, &Period::Year(2024)), dec!(999));
}

#[test]
fn repeated_aggregation_is_stable() {
    let store = seeded();
    let txs = store::list_transactions(store.conn(), &ListQuery::all()).unwrap();
    let feb = Period::parse("2025-02").unwrap();
    let first = (income_in(&txs, &feb), expense_in(&txs, &feb));
    let second = (income_in(&txs, &feb), expense_in(&txs, &feb));
    assert_eq!(first, second);
}

#[test]
fn period_parsing_and_navigation() {
    assert_eq!(Period::parse("2025-03").unwrap().key(), "2025-03");
    assert_eq!(Period::parse("2025").unwrap(), Period::Year(2025));
    assert!(Period::parse("2025-13").is_err());
    assert!(Period::parse("March").is_err());
    assert_eq!(Period::parse("2025-12").unwrap().next().key(), "2026-01");
    assert_eq!(Period::parse("2025-01").unwrap().previous().key(), "2024-12");
    assert!(!Period::parse("2025-01").unwrap().contains(d("2025-10-01")));
}

#[test]
fn calendar_helpers() {
    assert_eq!(days_in_month(d("2024-02-10")), 29);
    assert_eq!(days_in_month(d("2025-02-10")), 28);
    assert_eq!(days_in_month(d("2025-12-31")), 31);
    assert_eq!(days_remaining_in_month(d("2025-06-15")), 16);
    assert_eq!(days_remaining_in_month(d("2025-06-30")), 1);
    assert_eq!(months_remaining_in_year(d("2025-01-31")), 12);
    assert_eq!(months_remaining_in_year(d("2025-12-01")), 1);
    assert_eq!(next_day_of_month(15, d("2025-06-10")), d("2025-06-15"));
    assert_eq!(next_day_of_month(15, d("2025-06-15")), d("2025-06-15"));
    assert_eq!(next_day_of_month(5, d("2025-12-20")), d("2026-01-05"));
}
