// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::{require_day, require_positive, require_range, require_title};
use crate::engine::loans::{Amortization, amortize};
use crate::error::Result;
use crate::models::{LinkKind, NewTransaction, ObligationLink};
use crate::store::{self, Collection, NewLoan, NewLoanPayment, Store};

pub fn add_loan(store: &Store, loan: NewLoan) -> Result<i64> {
    let title = require_title(&loan.title)?;
    require_positive(loan.balance, "balance")?;
    require_positive(loan.monthly_payment, "monthly payment")?;
    require_day(loan.payment_day, "payment day")?;
    require_range(
        loan.annual_rate,
        Decimal::ZERO,
        Decimal::from(200),
        "annual rate",
    )?;
    let loan = NewLoan { title, ..loan };
    let id = store.write(&[Collection::Loans], |conn| store::insert_loan(conn, &loan))?;
    tracing::info!(id, title = %loan.title, balance = %loan.balance, "loan added");
    Ok(id)
}

#[derive(Debug, Clone, Serialize)]
pub struct LoanPaymentReceipt {
    pub loan_id: i64,
    pub payment_id: i64,
    pub transaction_id: i64,
    pub amortization: Amortization,
}

/// Applies one payment: updates the loan, appends the audit record and
/// mirrors the full amount as an expense, all in one transaction.
pub fn record_payment(
    store: &Store,
    loan_id: i64,
    amount: Decimal,
    date: NaiveDate,
) -> Result<LoanPaymentReceipt> {
    require_positive(amount, "payment amount")?;
    let receipt = store.write(
        &[
            Collection::Loans,
            Collection::LoanPayments,
            Collection::Transactions,
        ],
        |conn| {
            let loan = store::get_loan(conn, loan_id)?;
            let am = amortize(&loan, amount, date)?;
            store::update_loan_state(conn, loan.id, am.balance_after, Some(date), am.active)?;
            let payment_id = store::insert_loan_payment(
                conn,
                &NewLoanPayment {
                    loan_id: loan.id,
                    payment_date: date,
                    payment_amount: amount,
                    interest_amount: am.interest,
                    principal_amount: am.principal,
                    balance_before: am.balance_before,
                    balance_after: am.balance_after,
                },
            )?;
            let transaction_id = store::insert_transaction(
                conn,
                &NewTransaction::mirror(
                    date,
                    amount,
                    format!("Loan: {}", loan.title),
                    Some(format!(
                        "interest {}, principal {}",
                        am.interest, am.principal
                    )),
                    ObligationLink {
                        kind: LinkKind::LoanPayment,
                        id: payment_id,
                    },
                ),
            )?;
            Ok(LoanPaymentReceipt {
                loan_id: loan.id,
                payment_id,
                transaction_id,
                amortization: am,
            })
        },
    )?;
    tracing::info!(
        loan_id,
        amount = %amount,
        interest = %receipt.amortization.interest,
        balance = %receipt.amortization.balance_after,
        "loan payment recorded"
    );
    Ok(receipt)
}

/// Removes the loan and its payment log. Mirrored expenses stay in the ledger.
pub fn delete_loan(store: &Store, loan_id: i64) -> Result<()> {
    store.write(&[Collection::Loans, Collection::LoanPayments], |conn| {
        store::delete(conn, Collection::Loans, loan_id)
    })?;
    tracing::info!(loan_id, "loan deleted");
    Ok(())
}
