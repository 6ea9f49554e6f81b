// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tallybook::engine::loans::{amortize, daily_rate, rebuild_balance};
use tallybook::error::LedgerError;
use tallybook::ledger;
use tallybook::models::{LinkKind, Loan, NewTransaction, ObligationLink, TxKind};
use tallybook::store::{self, Collection, ListQuery, NewLoan, Store};

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn loan(balance: Decimal, rate: Decimal, last_payment: &str) -> Loan {
    Loan {
        id: 1,
        title: "Car".into(),
        balance,
        opening_balance: balance,
        monthly_payment: dec!(5000),
        payment_day: 15,
        annual_rate: rate,
        last_payment_date: Some(d(last_payment)),
        active: true,
        created_at: d("2025-01-01").and_hms_opt(9, 0, 0).unwrap(),
    }
}

/// A loan whose last payment was on 2025-03-01.
fn stored_loan(store: &Store) -> i64 {
    let id = ledger::loans::add_loan(
        store,
        NewLoan {
            title: "  Car  ".into(),
            balance: dec!(100000),
            monthly_payment: dec!(5000),
            payment_day: 15,
            annual_rate: dec!(24),
        },
    )
    .unwrap();
    store::update_loan_state(store.conn(), id, dec!(100000), Some(d("2025-03-01")), true).unwrap();
    id
}

#[test]
fn thirty_days_at_24_percent() {
    let l = loan(dec!(100000), dec!(24), "2025-03-01");
    let am = amortize(&l, dec!(5000), d("2025-03-31")).unwrap();
    assert_eq!(am.days, 30);
    assert!((am.daily_rate - dec!(0.0006575)).abs() < dec!(0.0000001));
    assert_eq!(am.interest, dec!(1972.60));
    assert_eq!(am.principal, dec!(3027.40));
    assert_eq!(am.balance_after, dec!(96972.60));
    assert_eq!(am.principal + am.interest, dec!(5000));
    assert!(am.active);
}

#[test]
fn payment_below_interest_moves_no_principal() {
    let l = loan(dec!(100000), dec!(24), "2025-03-01");
    let am = amortize(&l, dec!(1000), d("2025-03-31")).unwrap();
    assert_eq!(am.principal, Decimal::ZERO);
    assert_eq!(am.balance_after, dec!(100000));
}

#[test]
fn backdated_payment_accrues_nothing() {
    let l = loan(dec!(100000), dec!(24), "2025-03-01");
    let am = amortize(&l, dec!(5000), d("2025-02-01")).unwrap();
    assert_eq!(am.days, 0);
    assert_eq!(am.interest, Decimal::ZERO);
    assert_eq!(am.balance_after, dec!(95000));
}

#[test]
fn overpayment_closes_the_loan() {
    let l = loan(dec!(1200), dec!(0), "2025-03-01");
    let am = amortize(&l, dec!(5000), d("2025-03-31")).unwrap();
    assert_eq!(am.balance_after, Decimal::ZERO);
    assert!(!am.active);
    assert_eq!(daily_rate(dec!(0)), Decimal::ZERO);
}

#[test]
fn payment_writes_loan_audit_and_mirror_together() {
    let store = Store::open_in_memory().unwrap();
    let id = stored_loan(&store);
    let receipt = ledger::loans::record_payment(&store, id, dec!(5000), d("2025-03-31")).unwrap();

    let loan = store::get_loan(store.conn(), id).unwrap();
    assert_eq!(loan.title, "Car");
    assert_eq!(loan.balance, dec!(96972.60));
    assert_eq!(loan.last_payment_date, Some(d("2025-03-31")));

    let payments = store::list_loan_payments(store.conn(), Some(id)).unwrap();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].id, receipt.payment_id);
    assert_eq!(payments[0].interest_amount, dec!(1972.60));
    assert_eq!(payments[0].principal_amount, dec!(3027.40));
    assert_eq!(payments[0].balance_before, dec!(100000));

    let txs = store::list_transactions(store.conn(), &ListQuery::all()).unwrap();
    assert_eq!(txs.len(), 1);
    let tx = &txs[0];
    assert_eq!(tx.id, receipt.transaction_id);
    assert_eq!(tx.kind, TxKind::Expense);
    assert_eq!(tx.amount, dec!(5000));
    assert_eq!(tx.category, "Loan: Car");
    assert_eq!(tx.note.as_deref(), Some("interest 1972.60, principal 3027.40"));
    assert_eq!(
        tx.link,
        Some(ObligationLink {
            kind: LinkKind::LoanPayment,
            id: receipt.payment_id
        })
    );
}

#[test]
fn balance_never_increases_across_payments() {
    let store = Store::open_in_memory().unwrap();
    let id = stored_loan(&store);
    let mut last = dec!(100000);
    for date in ["2025-03-31", "2025-04-30", "2025-05-10", "2025-05-10", "2025-06-30"] {
        let r = ledger::loans::record_payment(&store, id, dec!(5000), d(date)).unwrap();
        assert!(r.amortization.balance_after <= last);
        last = r.amortization.balance_after;
    }
    let loan = store::get_loan(store.conn(), id).unwrap();
    let payments = store::list_loan_payments(store.conn(), Some(id)).unwrap();
    assert_eq!(rebuild_balance(&loan, &payments), loan.balance);
}

#[test]
fn failed_payment_writes_nothing() {
    let store = Store::open_in_memory().unwrap();
    let err = ledger::loans::record_payment(&store, 42, dec!(5000), d("2025-03-31")).unwrap_err();
    assert!(matches!(
        err,
        LedgerError::NotFound {
            collection: Collection::Loans,
            id: 42
        }
    ));

    let id = stored_loan(&store);
    let err = ledger::loans::record_payment(&store, id, dec!(0), d("2025-03-31")).unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));

    assert!(store::list_loan_payments(store.conn(), None).unwrap().is_empty());
    assert!(store::list_transactions(store.conn(), &ListQuery::all()).unwrap().is_empty());
    assert_eq!(store::get_loan(store.conn(), id).unwrap().balance, dec!(100000));
}

#[test]
fn loan_input_is_validated() {
    let store = Store::open_in_memory().unwrap();
    let bad = [
        NewLoan {
            title: " ".into(),
            balance: dec!(1000),
            monthly_payment: dec!(100),
            payment_day: 10,
            annual_rate: dec!(10),
        },
        NewLoan {
            title: "Mortgage".into(),
            balance: dec!(1000),
            monthly_payment: dec!(100),
            payment_day: 31,
            annual_rate: dec!(10),
        },
        NewLoan {
            title: "Mortgage".into(),
            balance: dec!(1000),
            monthly_payment: dec!(100),
            payment_day: 10,
            annual_rate: dec!(250),
        },
    ];
    for l in bad {
        assert!(matches!(
            ledger::loans::add_loan(&store, l),
            Err(LedgerError::Validation(_))
        ));
    }
    assert!(store::list_loans(store.conn()).unwrap().is_empty());
}

#[test]
fn mirror_insert_is_idempotent() {
    let store = Store::open_in_memory().unwrap();
    let link = ObligationLink {
        kind: LinkKind::LoanPayment,
        id: 7,
    };
    let mirror = NewTransaction::mirror(d("2025-03-31"), dec!(5000), "Loan: Car".into(), None, link);
    let (a, b) = store
        .write(&[Collection::Transactions], |conn| {
            let a = store::insert_transaction(conn, &mirror)?;
            let b = store::insert_transaction(conn, &mirror)?;
            Ok((a, b))
        })
        .unwrap();
    assert_eq!(a, b);
    assert_eq!(
        store::list_transactions(store.conn(), &ListQuery::all()).unwrap().len(),
        1
    );
}

#[test]
fn deleting_a_loan_keeps_its_cash_history() {
    let store = Store::open_in_memory().unwrap();
    let id = stored_loan(&store);
    ledger::loans::record_payment(&store, id, dec!(5000), d("2025-03-31")).unwrap();
    ledger::loans::delete_loan(&store, id).unwrap();

    assert!(store::list_loans(store.conn()).unwrap().is_empty());
    assert!(store::list_loan_payments(store.conn(), None).unwrap().is_empty());
    assert_eq!(
        store::list_transactions(store.conn(), &ListQuery::all()).unwrap().len(),
        1
    );
}

#[test]
fn interest_overflow_is_an_error() {
    let l = loan(Decimal::MAX, dec!(24), "2025-03-01");
    let err = amortize(&l, dec!(5000), d("2025-03-31")).unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));

    let store = Store::open_in_memory().unwrap();
    let id = stored_loan(&store);
    let err = ledger::loans::record_payment(&store, id, dec!(5000000000000), d("2025-03-31"))
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
    assert!(store::list_loan_payments(store.conn(), None).unwrap().is_empty());
}
