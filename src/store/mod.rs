// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! SQLite-backed record store.
//!
//! Reads are free functions over a `&Connection` so the same code runs on a
//! plain connection or inside a transaction. Writes that span several
//! collections go through [`Store::write`], which commits once and then
//! notifies subscribers of every collection it touched.

mod obligations;
mod planning;
mod transactions;

pub use obligations::*;
pub use planning::*;
pub use transactions::*;

use rusqlite::types::Type;
use rusqlite::{Connection, Row, params};
use rust_decimal::Decimal;
use std::cell::RefCell;
use std::fmt;

use crate::db;
use crate::engine::period::Period;
use crate::error::{LedgerError, Result};
use crate::models::LinkKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Settings,
    Transactions,
    Loans,
    LoanPayments,
    CardAccounts,
    CardEvents,
    TaxSettings,
    TaxPayments,
    SavingsSettings,
    SavingsEntries,
    MonthCarryovers,
    RecurringExpenses,
    RecurringPayments,
}

impl Collection {
    pub const ALL: [Collection; 13] = [
        Collection::Settings,
        Collection::Transactions,
        Collection::Loans,
        Collection::LoanPayments,
        Collection::CardAccounts,
        Collection::CardEvents,
        Collection::TaxSettings,
        Collection::TaxPayments,
        Collection::SavingsSettings,
        Collection::SavingsEntries,
        Collection::MonthCarryovers,
        Collection::RecurringExpenses,
        Collection::RecurringPayments,
    ];

    pub fn table(&self) -> &'static str {
        match self {
            Collection::Settings => "settings",
            Collection::Transactions => "transactions",
            Collection::Loans => "loans",
            Collection::LoanPayments => "loan_payments",
            Collection::CardAccounts => "card_accounts",
            Collection::CardEvents => "card_events",
            Collection::TaxSettings => "tax_settings",
            Collection::TaxPayments => "tax_payments",
            Collection::SavingsSettings => "savings_settings",
            Collection::SavingsEntries => "savings_entries",
            Collection::MonthCarryovers => "month_carryovers",
            Collection::RecurringExpenses => "recurring_expenses",
            Collection::RecurringPayments => "recurring_payments",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}

/// Collection holding the audit record a mirror points at.
pub fn link_source(kind: LinkKind) -> Collection {
    match kind {
        LinkKind::LoanPayment => Collection::LoanPayments,
        LinkKind::CardEvent => Collection::CardEvents,
        LinkKind::TaxPayment => Collection::TaxPayments,
        LinkKind::SavingsEntry => Collection::SavingsEntries,
        LinkKind::RecurringPayment => Collection::RecurringPayments,
    }
}

/// Filter shared by the dated `list_*` functions.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub period: Option<Period>,
    pub limit: Option<usize>,
}

impl ListQuery {
    pub fn all() -> Self {
        ListQuery::default()
    }

    pub fn period(period: Period) -> Self {
        ListQuery {
            period: Some(period),
            limit: None,
        }
    }

    /// Appends the WHERE/LIMIT fragments for `date_col` and returns the bound values.
    fn apply(&self, sql: &mut String, date_col: &str) -> Vec<String> {
        let mut binds = Vec::new();
        if let Some(p) = &self.period {
            sql.push_str(&format!(
                " AND substr({col},1,{len})=?",
                col = date_col,
                len = p.key().len()
            ));
            binds.push(p.key());
        }
        binds
    }

    fn limit_clause(&self) -> String {
        match self.limit {
            Some(n) => format!(" LIMIT {}", n),
            None => String::new(),
        }
    }
}

type Subscriber = Box<dyn Fn(Collection)>;

pub struct Store {
    conn: Connection,
    subscribers: RefCell<Vec<(Collection, Subscriber)>>,
}

impl Store {
    pub fn new(conn: Connection) -> Result<Self> {
        db::init_schema(&conn)?;
        Ok(Store {
            conn,
            subscribers: RefCell::new(Vec::new()),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        Store::new(Connection::open_in_memory()?)
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Registers `callback` to run after every committed write to `collection`.
    pub fn subscribe<F>(&self, collection: Collection, callback: F)
    where
        F: Fn(Collection) + 'static,
    {
        self.subscribers
            .borrow_mut()
            .push((collection, Box::new(callback)));
    }

    /// Runs `f` in one SQLite transaction. Any error rolls back every write
    /// made by `f`; subscribers only hear about committed changes.
    pub fn write<T, F>(&self, touched: &[Collection], f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let tx = self.conn.unchecked_transaction()?;
        let out = f(&tx)?;
        tx.commit()?;
        self.notify(touched);
        Ok(out)
    }

    fn notify(&self, touched: &[Collection]) {
        let subs = self.subscribers.borrow();
        for c in touched {
            tracing::debug!(collection = %c, "change notification");
            for (watched, cb) in subs.iter() {
                if watched == c {
                    cb(*c);
                }
            }
        }
    }
}

/// Deletes one record by id. Returns `NotFound` if nothing matched.
pub fn delete(conn: &Connection, collection: Collection, id: i64) -> Result<()> {
    let n = conn.execute(
        &format!("DELETE FROM {} WHERE id=?1", collection.table()),
        params![id],
    )?;
    if n == 0 {
        return Err(LedgerError::NotFound { collection, id });
    }
    Ok(())
}

pub(crate) fn dec(r: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let s: String = r.get(idx)?;
    s.trim()
        .parse::<Decimal>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(crate) fn not_found(collection: Collection, id: i64) -> impl FnOnce(rusqlite::Error) -> LedgerError {
    move |e| match e {
        rusqlite::Error::QueryReturnedNoRows => LedgerError::NotFound { collection, id },
        other => LedgerError::Store(other),
    }
}

pub(crate) fn query_list<T, F>(
    conn: &Connection,
    sql: &str,
    binds: &[String],
    map: F,
) -> Result<Vec<T>>
where
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(rusqlite::params_from_iter(binds.iter()), map)?;
    let mut out = Vec::new();
    for row in rows {
        match row {
            Ok(v) => out.push(v),
            // A malformed stored value drops that row, not the whole list.
            Err(
                e @ (rusqlite::Error::FromSqlConversionFailure(..)
                | rusqlite::Error::InvalidColumnType(..)),
            ) => tracing::warn!(error = %e, "skipping unreadable row"),
            Err(e) => return Err(e.into()),
        }
    }
    Ok(out)
}
