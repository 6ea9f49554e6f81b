// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::engine::period::{Period, expense_in, income_in};
use crate::error::{Result, invalid};
use crate::store::{self, Collection, ListQuery, Store};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthClose {
    pub month: String,
    pub carry_in: Decimal,
    pub income: Decimal,
    pub expense: Decimal,
    pub closing: Decimal,
    /// The month that received `closing` as its carry-in.
    pub next_month: String,
}

/// Closes `month`: carry-in plus income minus expense becomes the carry-in
/// of the following month. Closing the same month again overwrites it.
pub fn close_month(store: &Store, month: Period) -> Result<MonthClose> {
    let Period::Month { .. } = month else {
        return Err(invalid("only a calendar month (YYYY-MM) can be closed"));
    };
    let key = month.key();
    let next = month.next().key();
    let close = store.write(&[Collection::MonthCarryovers], |conn| {
        let carry_in = store::get_carryover(conn, &key)?
            .map(|c| c.carry_in)
            .unwrap_or_default();
        let txs = store::list_transactions(conn, &ListQuery::period(month))?;
        let income = income_in(&txs, &month);
        let expense = expense_in(&txs, &month);
        let closing = carry_in + income - expense;
        store::upsert_carryover(conn, &next, closing)?;
        Ok(MonthClose {
            month: key.clone(),
            carry_in,
            income,
            expense,
            closing,
            next_month: next.clone(),
        })
    })?;
    tracing::info!(month = %close.month, closing = %close.closing, "month closed");
    Ok(close)
}
