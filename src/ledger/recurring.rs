// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::{require_day, require_positive, require_title};
use crate::engine::period::Period;
use crate::error::{Result, invalid};
use crate::models::{LinkKind, NewTransaction, ObligationLink};
use crate::store::{self, Collection, Store};

pub fn add(store: &Store, title: &str, amount: Decimal, pay_day: u32) -> Result<i64> {
    let title = require_title(title)?;
    require_positive(amount, "amount")?;
    require_day(pay_day, "pay day")?;
    let id = store.write(&[Collection::RecurringExpenses], |conn| {
        store::insert_recurring(conn, &title, amount, pay_day)
    })?;
    tracing::info!(id, title = %title, amount = %amount, "recurring obligation added");
    Ok(id)
}

#[derive(Debug, Clone, Copy)]
pub struct RecurringReceipt {
    pub payment_id: i64,
    pub transaction_id: i64,
}

/// Marks the obligation paid for `month` and mirrors it as an expense.
/// A second payment for the same month is rejected.
pub fn mark_paid(
    store: &Store,
    recurring_id: i64,
    month: Period,
    paid_date: NaiveDate,
    amount: Option<Decimal>,
) -> Result<RecurringReceipt> {
    let Period::Month { .. } = month else {
        return Err(invalid("recurring payments are tracked per month (YYYY-MM)"));
    };
    if let Some(a) = amount {
        require_positive(a, "amount")?;
    }
    let receipt = store.write(
        &[Collection::RecurringPayments, Collection::Transactions],
        |conn| {
            let obligation = store::get_recurring(conn, recurring_id)?;
            let amount = amount.unwrap_or(obligation.amount);
            let payment_id =
                store::insert_recurring_payment(conn, obligation.id, &month.key(), paid_date, amount)?
                    .ok_or_else(|| {
                        invalid(format!(
                            "'{}' is already paid for {}",
                            obligation.title, month
                        ))
                    })?;
            let transaction_id = store::insert_transaction(
                conn,
                &NewTransaction::mirror(
                    paid_date,
                    amount,
                    obligation.title.clone(),
                    Some(format!("recurring {}", month)),
                    ObligationLink {
                        kind: LinkKind::RecurringPayment,
                        id: payment_id,
                    },
                ),
            )?;
            Ok(RecurringReceipt {
                payment_id,
                transaction_id,
            })
        },
    )?;
    tracing::info!(recurring_id, month = %month, "recurring obligation paid");
    Ok(receipt)
}

pub fn deactivate(store: &Store, recurring_id: i64) -> Result<()> {
    store.write(&[Collection::RecurringExpenses], |conn| {
        store::set_recurring_active(conn, recurring_id, false)
    })?;
    tracing::info!(recurring_id, "recurring obligation deactivated");
    Ok(())
}

pub fn delete(store: &Store, recurring_id: i64) -> Result<()> {
    store.write(
        &[Collection::RecurringExpenses, Collection::RecurringPayments],
        |conn| store::delete(conn, Collection::RecurringExpenses, recurring_id),
    )?;
    tracing::info!(recurring_id, "recurring obligation deleted");
    Ok(())
}
