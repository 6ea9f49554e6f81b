// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use rusqlite::Connection;

use super::require_positive;
use crate::error::{Result, invalid};
use crate::models::{NewTransaction, TransactionPatch, TxKind};
use crate::store::{self, Collection, Store};

fn category_or(category: &str, fallback: &str) -> String {
    let c = category.trim();
    if c.is_empty() {
        fallback.to_string()
    } else {
        c.to_string()
    }
}

pub fn add_income(
    store: &Store,
    date: NaiveDate,
    amount: Decimal,
    category: &str,
    taxable: bool,
    note: Option<String>,
) -> Result<i64> {
    add(
        store,
        NewTransaction {
            date,
            kind: TxKind::Income,
            amount,
            category: category_or(category, "Income"),
            taxable: Some(taxable),
            note,
            link: None,
        },
    )
}

pub fn add_expense(
    store: &Store,
    date: NaiveDate,
    amount: Decimal,
    category: &str,
    note: Option<String>,
) -> Result<i64> {
    add(
        store,
        NewTransaction {
            date,
            kind: TxKind::Expense,
            amount,
            category: category_or(category, "Expense"),
            taxable: None,
            note,
            link: None,
        },
    )
}

pub fn add(store: &Store, tx: NewTransaction) -> Result<i64> {
    require_positive(tx.amount, "amount")?;
    let id = store.write(&[Collection::Transactions], |conn| {
        store::insert_transaction(conn, &tx)
    })?;
    tracing::info!(id, kind = tx.kind.as_str(), amount = %tx.amount, "transaction recorded");
    Ok(id)
}

/// Mirrors follow their audit record. They can only be changed by hand once
/// that record is gone.
fn require_unmirrored(conn: &Connection, id: i64) -> Result<()> {
    let tx = store::get_transaction(conn, id)?;
    if let Some(link) = tx.link {
        if store::link_source_exists(conn, link)? {
            return Err(invalid(format!(
                "transaction {} mirrors {} {}; change that record instead",
                id,
                link.kind.as_str(),
                link.id
            )));
        }
    }
    Ok(())
}

pub fn edit(store: &Store, id: i64, patch: &TransactionPatch) -> Result<()> {
    if let Some(a) = patch.amount {
        require_positive(a, "amount")?;
    }
    store.write(&[Collection::Transactions], |conn| {
        require_unmirrored(conn, id)?;
        store::update_transaction(conn, id, patch)
    })?;
    tracing::info!(id, "transaction edited");
    Ok(())
}

pub fn delete(store: &Store, id: i64) -> Result<()> {
    store.write(&[Collection::Transactions], |conn| {
        require_unmirrored(conn, id)?;
        store::delete(conn, Collection::Transactions, id)
    })?;
    tracing::info!(id, "transaction deleted");
    Ok(())
}
