// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use tallybook::engine::period::Period;
use tallybook::ledger;
use tallybook::store::{self, Store};

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[test]
fn closing_chains_into_the_next_month() {
    let store = Store::open_in_memory().unwrap();
    let t = &store;
    ledger::transactions::add_income(t, d("2025-11-02"), dec!(1000), "", true, None).unwrap();
    ledger::transactions::add_expense(t, d("2025-11-15"), dec!(300), "", None).unwrap();
    ledger::transactions::add_income(t, d("2025-12-01"), dec!(500), "", true, None).unwrap();
    ledger::transactions::add_expense(t, d("2025-12-24"), dec!(900), "", None).unwrap();

    let nov = ledger::carryover::close_month(t, Period::parse("2025-11").unwrap()).unwrap();
    assert_eq!(nov.carry_in, dec!(0));
    assert_eq!(nov.closing, dec!(700));
    assert_eq!(nov.next_month, "2025-12");

    let dec_close = ledger::carryover::close_month(t, Period::parse("2025-12").unwrap()).unwrap();
    assert_eq!(dec_close.carry_in, dec!(700));
    assert_eq!(dec_close.closing, dec!(300));
    assert_eq!(dec_close.next_month, "2026-01");
    assert_eq!(
        store::get_carryover(store.conn(), "2026-01").unwrap().unwrap().carry_in,
        dec!(300)
    );
}

#[test]
fn closing_again_overwrites_the_next_carry_in() {
    let store = Store::open_in_memory().unwrap();
    let nov = Period::parse("2025-11").unwrap();
    ledger::carryover::close_month(&store, nov).unwrap();
    ledger::transactions::add_expense(&store, d("2025-11-15"), dec!(300), "", None).unwrap();
    let again = ledger::carryover::close_month(&store, nov).unwrap();
    assert_eq!(again.closing, dec!(-300));
    assert_eq!(store::list_carryovers(store.conn()).unwrap().len(), 1);
}

#[test]
fn years_cannot_be_closed() {
    let store = Store::open_in_memory().unwrap();
    assert!(ledger::carryover::close_month(&store, Period::Year(2025)).is_err());
    assert!(store::list_carryovers(store.conn()).unwrap().is_empty());
}
