// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, OptionalExtension, Row, params};

use super::{Collection, ListQuery, dec, link_source, not_found, query_list};
use crate::engine::normalize::normalize_tx_kind;
use crate::error::{LedgerError, Result};
use crate::models::{
    LinkKind, NewTransaction, ObligationLink, Transaction, TransactionPatch, TxKind,
};

const TX_COLUMNS: &str =
    "id, date, kind, amount, category, taxable, note, link_kind, link_id, created_at";

fn tx_from_row(r: &Row<'_>) -> rusqlite::Result<Transaction> {
    let raw_kind: String = r.get(2)?;
    let link_kind: Option<String> = r.get(7)?;
    let link_id: Option<i64> = r.get(8)?;
    let link = match (link_kind.as_deref().and_then(LinkKind::parse), link_id) {
        (Some(kind), Some(id)) => Some(ObligationLink { kind, id }),
        _ => None,
    };
    Ok(Transaction {
        id: r.get(0)?,
        date: r.get(1)?,
        kind: normalize_tx_kind(&raw_kind),
        amount: dec(r, 3)?,
        category: r.get(4)?,
        taxable: r.get(5)?,
        note: r.get(6)?,
        link,
        created_at: r.get(9)?,
    })
}

/// Inserts a transaction. A linked insert is idempotent: when a transaction
/// already mirrors the same audit record, its id is returned unchanged.
pub fn insert_transaction(conn: &Connection, tx: &NewTransaction) -> Result<i64> {
    let taxable = match tx.kind {
        TxKind::Income => tx.taxable,
        TxKind::Expense => None,
    };
    let n = conn.execute(
        "INSERT INTO transactions(date, kind, amount, category, taxable, note, link_kind, link_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
         ON CONFLICT(link_kind, link_id) DO NOTHING",
        params![
            tx.date,
            tx.kind.as_str(),
            tx.amount.to_string(),
            tx.category,
            taxable,
            tx.note,
            tx.link.map(|l| l.kind.as_str()),
            tx.link.map(|l| l.id),
        ],
    )?;
    if n == 0 {
        if let Some(link) = tx.link {
            if let Some(existing) = find_mirror(conn, link)? {
                tracing::debug!(link = ?link, id = existing.id, "mirror already present");
                return Ok(existing.id);
            }
        }
    }
    Ok(conn.last_insert_rowid())
}

pub fn get_transaction(conn: &Connection, id: i64) -> Result<Transaction> {
    conn.query_row(
        &format!("SELECT {} FROM transactions WHERE id=?1", TX_COLUMNS),
        params![id],
        tx_from_row,
    )
    .map_err(not_found(Collection::Transactions, id))
}

/// Newest first.
pub fn list_transactions(conn: &Connection, q: &ListQuery) -> Result<Vec<Transaction>> {
    let mut sql = format!("SELECT {} FROM transactions WHERE 1=1", TX_COLUMNS);
    let binds = q.apply(&mut sql, "date");
    sql.push_str(" ORDER BY date DESC, id DESC");
    sql.push_str(&q.limit_clause());
    query_list(conn, &sql, &binds, tx_from_row)
}

pub fn find_mirror(conn: &Connection, link: ObligationLink) -> Result<Option<Transaction>> {
    Ok(conn
        .query_row(
            &format!(
                "SELECT {} FROM transactions WHERE link_kind=?1 AND link_id=?2",
                TX_COLUMNS
            ),
            params![link.kind.as_str(), link.id],
            tx_from_row,
        )
        .optional()?)
}

/// Whether the audit record behind `link` still exists.
pub fn link_source_exists(conn: &Connection, link: ObligationLink) -> Result<bool> {
    let found = conn
        .query_row(
            &format!("SELECT 1 FROM {} WHERE id=?1", link_source(link.kind).table()),
            params![link.id],
            |r| r.get::<_, i64>(0),
        )
        .optional()?;
    Ok(found.is_some())
}

pub fn delete_mirror(conn: &Connection, link: ObligationLink) -> Result<bool> {
    let n = conn.execute(
        "DELETE FROM transactions WHERE link_kind=?1 AND link_id=?2",
        params![link.kind.as_str(), link.id],
    )?;
    Ok(n > 0)
}

pub fn update_transaction(conn: &Connection, id: i64, patch: &TransactionPatch) -> Result<()> {
    let current = get_transaction(conn, id)?;
    let date = patch.date.unwrap_or(current.date);
    let amount = patch.amount.unwrap_or(current.amount);
    let category = patch.category.clone().unwrap_or(current.category);
    let note = patch.note.clone().unwrap_or(current.note);
    // The tax flag only exists on income.
    let taxable = match current.kind {
        TxKind::Income => patch.taxable.or(current.taxable),
        TxKind::Expense => None,
    };
    let n = conn.execute(
        "UPDATE transactions SET date=?1, amount=?2, category=?3, note=?4, taxable=?5 WHERE id=?6",
        params![date, amount.to_string(), category, note, taxable, id],
    )?;
    if n == 0 {
        return Err(LedgerError::NotFound {
            collection: Collection::Transactions,
            id,
        });
    }
    Ok(())
}

/// Distinct non-empty categories used for `kind`, sorted.
pub fn categories(conn: &Connection, kind: TxKind) -> Result<Vec<String>> {
    let txs = list_transactions(conn, &ListQuery::all())?;
    let mut cats: Vec<String> = txs
        .into_iter()
        .filter(|t| t.kind == kind)
        .map(|t| t.category.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect();
    cats.sort();
    cats.dedup();
    Ok(cats)
}
