// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal_macros::dec;
use tallybook::config::{self, Settings};
use tallybook::engine::budget::BudgetPolicy;
use tallybook::error::LedgerError;
use tallybook::store::{self, Store};

#[test]
fn defaults_when_nothing_is_stored() {
    let store = Store::open_in_memory().unwrap();
    let s = Settings::load(store.conn()).unwrap();
    assert_eq!(s, Settings::default());
    assert_eq!(s.planned_income, None);
    assert!(s.mirror_savings);
    assert_eq!(s.get(config::BUDGET_POLICY).unwrap(), "forecast");
}

#[test]
fn values_are_validated_and_canonicalized() {
    let store = Store::open_in_memory().unwrap();
    let conn = store.conn();
    config::set(conn, config::PLANNED_INCOME, "120000,50").unwrap();
    config::set(conn, config::BUDGET_POLICY, "Cash").unwrap();
    config::set(conn, config::MIRROR_SAVINGS, "no").unwrap();
    config::set(conn, config::CURRENCY_SYMBOL, " $ ").unwrap();

    let s = Settings::load(conn).unwrap();
    assert_eq!(s.planned_income, Some(dec!(120000.50)));
    assert_eq!(s.budget_policy, BudgetPolicy::CashPosition);
    assert!(!s.mirror_savings);
    assert_eq!(s.currency_symbol, "$");
    assert_eq!(store::get_setting(conn, config::MIRROR_SAVINGS).unwrap().as_deref(), Some("false"));

    config::set(conn, config::PLANNED_INCOME, "").unwrap();
    assert_eq!(Settings::load(conn).unwrap().planned_income, None);
}

#[test]
fn bad_input_is_rejected() {
    let store = Store::open_in_memory().unwrap();
    let conn = store.conn();
    for (key, value) in [
        (config::PLANNED_INCOME, "lots"),
        (config::PLANNED_INCOME, "-5"),
        (config::BUDGET_POLICY, "envelopes"),
        (config::MIRROR_SAVINGS, "maybe"),
        ("base_currency", "USD"),
    ] {
        assert!(
            matches!(config::set(conn, key, value), Err(LedgerError::Config(_))),
            "{} = {}",
            key,
            value
        );
    }
    assert!(Settings::load(conn).unwrap().get("nope").is_err());
}

#[test]
fn unreadable_stored_values_fall_back() {
    let store = Store::open_in_memory().unwrap();
    store::set_setting(store.conn(), config::BUDGET_POLICY, "???").unwrap();
    store::set_setting(store.conn(), config::MIRROR_SAVINGS, "perhaps").unwrap();
    let s = Settings::load(store.conn()).unwrap();
    assert_eq!(s.budget_policy, BudgetPolicy::Forecast);
    assert!(s.mirror_savings);
}
