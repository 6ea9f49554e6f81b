// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use tallybook::engine::period::Period;
use tallybook::engine::recurring::{statuses, unpaid_total};
use tallybook::error::LedgerError;
use tallybook::ledger;
use tallybook::models::LinkKind;
use tallybook::store::{self, ListQuery, Store};

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn june() -> Period {
    Period::parse("2025-06").unwrap()
}

#[test]
fn one_payment_per_month() {
    let store = Store::open_in_memory().unwrap();
    let id = ledger::recurring::add(&store, "Rent", dec!(30000), 5).unwrap();

    let r = ledger::recurring::mark_paid(&store, id, june(), d("2025-06-04"), None).unwrap();
    let tx = store::get_transaction(store.conn(), r.transaction_id).unwrap();
    assert_eq!(tx.amount, dec!(30000));
    assert_eq!(tx.category, "Rent");
    assert_eq!(tx.note.as_deref(), Some("recurring 2025-06"));
    assert_eq!(tx.link.map(|l| (l.kind, l.id)), Some((LinkKind::RecurringPayment, r.payment_id)));

    let err = ledger::recurring::mark_paid(&store, id, june(), d("2025-06-20"), Some(dec!(100)))
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
    assert_eq!(
        store::list_transactions(store.conn(), &ListQuery::all()).unwrap().len(),
        1
    );

    // next month is a fresh slot
    ledger::recurring::mark_paid(&store, id, june().next(), d("2025-07-03"), Some(dec!(31000)))
        .unwrap();
    assert_eq!(store::list_recurring_payments(store.conn(), None).unwrap().len(), 2);
}

#[test]
fn unpaid_total_covers_active_obligations_only() {
    let store = Store::open_in_memory().unwrap();
    let rent = ledger::recurring::add(&store, "Rent", dec!(30000), 5).unwrap();
    ledger::recurring::add(&store, "Phone", dec!(700), 20).unwrap();
    let gym = ledger::recurring::add(&store, "Gym", dec!(2500), 1).unwrap();
    ledger::recurring::deactivate(&store, gym).unwrap();
    ledger::recurring::mark_paid(&store, rent, june(), d("2025-06-04"), None).unwrap();

    let obligations = store::list_recurring(store.conn()).unwrap();
    let payments = store::list_recurring_payments(store.conn(), None).unwrap();
    let st = statuses(&obligations, &payments, d("2025-06-10"));
    assert_eq!(st.len(), 2);
    assert_eq!(unpaid_total(&st), dec!(700));
    let phone = st.iter().find(|s| s.obligation.title == "Phone").unwrap();
    assert!(!phone.is_paid());
    assert_eq!(phone.next_due, d("2025-06-20"));
}

#[test]
fn only_calendar_months_are_accepted() {
    let store = Store::open_in_memory().unwrap();
    let id = ledger::recurring::add(&store, "Rent", dec!(30000), 5).unwrap();
    assert!(ledger::recurring::mark_paid(&store, id, Period::Year(2025), d("2025-06-04"), None).is_err());
    assert!(ledger::recurring::add(&store, "Rent", dec!(30000), 30).is_err());
    assert!(matches!(
        ledger::recurring::mark_paid(&store, 99, june(), d("2025-06-04"), None),
        Err(LedgerError::NotFound { .. })
    ));
}

#[test]
fn deleting_an_obligation_drops_its_payments() {
    let store = Store::open_in_memory().unwrap();
    let id = ledger::recurring::add(&store, "Rent", dec!(30000), 5).unwrap();
    ledger::recurring::mark_paid(&store, id, june(), d("2025-06-04"), None).unwrap();
    ledger::recurring::delete(&store, id).unwrap();
    assert!(store::list_recurring(store.conn()).unwrap().is_empty());
    assert!(store::list_recurring_payments(store.conn(), None).unwrap().is_empty());
}
