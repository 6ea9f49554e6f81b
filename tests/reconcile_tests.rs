// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tallybook::ledger;
use tallybook::ledger::reconcile::reconcile;
use tallybook::store::{self, NewCard, NewLoan, Store};
use tallybook::{cli, commands::doctor};

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn seeded() -> (Store, i64, i64) {
    let store = Store::open_in_memory().unwrap();
    let loan = ledger::loans::add_loan(
        &store,
        NewLoan {
            title: "Car".into(),
            balance: dec!(100000),
            monthly_payment: dec!(5000),
            payment_day: 15,
            annual_rate: dec!(24),
        },
    )
    .unwrap();
    store::update_loan_state(store.conn(), loan, dec!(100000), Some(d("2025-03-01")), true)
        .unwrap();
    ledger::loans::record_payment(&store, loan, dec!(5000), d("2025-03-31")).unwrap();
    ledger::loans::record_payment(&store, loan, dec!(5000), d("2025-04-30")).unwrap();

    let card = ledger::cards::add_card(
        &store,
        NewCard {
            title: "Visa".into(),
            balance: dec!(10000),
            statement_day: 5,
            due_day: 25,
            min_payment_rate: dec!(0.05),
        },
    )
    .unwrap();
    ledger::cards::accrue_interest(&store, card, dec!(300), d("2025-04-05"), None).unwrap();
    ledger::cards::record_payment(&store, card, dec!(2000), d("2025-04-20"), None).unwrap();
    (store, loan, card)
}

#[test]
fn consistent_ledger_is_clean() {
    let (store, _, _) = seeded();
    let report = reconcile(&store, false).unwrap();
    assert!(report.is_clean(), "{:?}", report);
}

#[test]
fn drift_is_reported_then_repaired() {
    let (store, loan, card) = seeded();
    let good_loan = store::get_loan(store.conn(), loan).unwrap();
    store::update_loan_state(store.conn(), loan, dec!(1), good_loan.last_payment_date, true)
        .unwrap();
    store::update_card_state(store.conn(), card, Decimal::ZERO, false).unwrap();

    let report = reconcile(&store, false).unwrap();
    assert_eq!(report.drift.len(), 2);
    assert!(!report.repaired);
    let loan_drift = report.drift.iter().find(|x| x.id == loan && x.collection == "loans").unwrap();
    assert_eq!(loan_drift.stored, dec!(1));
    assert_eq!(loan_drift.rebuilt, good_loan.balance);
    // dry run leaves the stored value alone
    assert_eq!(store::get_loan(store.conn(), loan).unwrap().balance, dec!(1));

    let fixed = reconcile(&store, true).unwrap();
    assert!(fixed.repaired);
    assert_eq!(store::get_loan(store.conn(), loan).unwrap().balance, good_loan.balance);
    let c = store::get_card(store.conn(), card).unwrap();
    assert_eq!(c.balance, dec!(8300));
    assert!(c.active);
    assert!(reconcile(&store, false).unwrap().is_clean());
}

#[test]
fn mirrors_of_deleted_records_are_reported() {
    let (store, loan, _) = seeded();
    ledger::loans::delete_loan(&store, loan).unwrap();
    let report = reconcile(&store, true).unwrap();
    assert!(report.drift.is_empty());
    assert!(!report.repaired);
    assert_eq!(report.orphan_mirrors.len(), 2);
    assert!(report.orphan_mirrors.iter().all(|o| o.link_kind == "loan_payment"));
}

#[test]
fn doctor_command_applies_repairs() {
    let (store, loan, _) = seeded();
    store::update_loan_state(store.conn(), loan, dec!(5), None, true).unwrap();
    let matches = cli::build_cli().get_matches_from(["tallybook", "doctor", "--apply"]);
    if let Some(("doctor", m)) = matches.subcommand() {
        doctor::handle(&store, m).unwrap();
    } else {
        panic!("no doctor subcommand");
    }
    assert_ne!(store::get_loan(store.conn(), loan).unwrap().balance, dec!(5));
}

fn empty_card(store: &Store) -> i64 {
    ledger::cards::add_card(
        store,
        NewCard {
            title: "Mir".into(),
            balance: Decimal::ZERO,
            statement_day: 1,
            due_day: 20,
            min_payment_rate: dec!(0.05),
        },
    )
    .unwrap()
}

#[test]
fn backdated_card_payment_is_not_drift() {
    let store = Store::open_in_memory().unwrap();
    let card = empty_card(&store);
    ledger::cards::accrue_interest(&store, card, dec!(100), d("2025-06-10"), None).unwrap();
    ledger::cards::record_payment(&store, card, dec!(100), d("2025-06-01"), None).unwrap();
    assert_eq!(store::get_card(store.conn(), card).unwrap().balance, Decimal::ZERO);

    let report = reconcile(&store, true).unwrap();
    assert!(report.is_clean(), "{:?}", report);
    assert!(!report.repaired);
    let c = store::get_card(store.conn(), card).unwrap();
    assert_eq!(c.balance, Decimal::ZERO);
    assert!(!c.active);
}

#[test]
fn card_repair_replays_events_in_recorded_order() {
    let store = Store::open_in_memory().unwrap();
    let card = empty_card(&store);
    // Payment on an empty card is absorbed; the later-dated interest stays.
    ledger::cards::record_payment(&store, card, dec!(50), d("2025-06-20"), None).unwrap();
    ledger::cards::accrue_interest(&store, card, dec!(80), d("2025-06-05"), None).unwrap();
    ledger::cards::record_payment(&store, card, dec!(30), d("2025-06-01"), None).unwrap();
    assert_eq!(store::get_card(store.conn(), card).unwrap().balance, dec!(50));

    store::update_card_state(store.conn(), card, dec!(999), true).unwrap();
    let report = reconcile(&store, true).unwrap();
    assert_eq!(report.drift.len(), 1);
    assert_eq!(report.drift[0].rebuilt, dec!(50));
    assert_eq!(store::get_card(store.conn(), card).unwrap().balance, dec!(50));
    assert!(reconcile(&store, false).unwrap().is_clean());
}
