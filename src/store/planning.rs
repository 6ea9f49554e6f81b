// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;

use super::{Collection, ListQuery, dec, not_found, query_list};
use crate::engine::normalize::normalize_tax_kind;
use crate::error::{LedgerError, Result};
use crate::models::{
    MonthCarryover, RecurringObligation, RecurringPayment, SavingsEntry, SavingsSettings,
    TaxKind, TaxPayment, TaxSettings,
};

// ---- key/value settings ----

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    Ok(conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub fn clear_setting(conn: &Connection, key: &str) -> Result<()> {
    conn.execute("DELETE FROM settings WHERE key=?1", params![key])?;
    Ok(())
}

// ---- tax ----

fn tax_settings_from_row(r: &Row<'_>) -> rusqlite::Result<TaxSettings> {
    Ok(TaxSettings {
        id: r.get(0)?,
        annual_fixed_levy: dec(r, 1)?,
        extra_rate: dec(r, 2)?,
        created_at: r.get(3)?,
    })
}

/// The newest settings row, if any.
pub fn latest_tax_settings(conn: &Connection) -> Result<Option<TaxSettings>> {
    Ok(conn
        .query_row(
            "SELECT id, annual_fixed_levy, extra_rate, created_at FROM tax_settings
             ORDER BY created_at DESC, id DESC LIMIT 1",
            [],
            tax_settings_from_row,
        )
        .optional()?)
}

pub fn insert_tax_settings(
    conn: &Connection,
    annual_fixed_levy: Decimal,
    extra_rate: Decimal,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO tax_settings(annual_fixed_levy, extra_rate) VALUES (?1, ?2)",
        params![annual_fixed_levy.to_string(), extra_rate.to_string()],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_tax_settings(
    conn: &Connection,
    id: i64,
    annual_fixed_levy: Decimal,
    extra_rate: Decimal,
) -> Result<()> {
    let n = conn.execute(
        "UPDATE tax_settings SET annual_fixed_levy=?1, extra_rate=?2 WHERE id=?3",
        params![annual_fixed_levy.to_string(), extra_rate.to_string(), id],
    )?;
    if n == 0 {
        return Err(LedgerError::NotFound {
            collection: Collection::TaxSettings,
            id,
        });
    }
    Ok(())
}

const TAX_PAYMENT_COLUMNS: &str = "id, date, kind, amount, note, created_at";

fn tax_payment_from_row(r: &Row<'_>) -> rusqlite::Result<TaxPayment> {
    let kind: String = r.get(2)?;
    Ok(TaxPayment {
        id: r.get(0)?,
        date: r.get(1)?,
        kind: normalize_tax_kind(&kind),
        amount: dec(r, 3)?,
        note: r.get(4)?,
        created_at: r.get(5)?,
    })
}

pub fn insert_tax_payment(
    conn: &Connection,
    date: Option<NaiveDate>,
    kind: TaxKind,
    amount: Decimal,
    note: Option<&str>,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO tax_payments(date, kind, amount, note) VALUES (?1, ?2, ?3, ?4)",
        params![date, kind.as_str(), amount.to_string(), note],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_tax_payment(conn: &Connection, id: i64) -> Result<TaxPayment> {
    conn.query_row(
        &format!("SELECT {} FROM tax_payments WHERE id=?1", TAX_PAYMENT_COLUMNS),
        params![id],
        tax_payment_from_row,
    )
    .map_err(not_found(Collection::TaxPayments, id))
}

/// Newest first; undated payments sort last.
pub fn list_tax_payments(conn: &Connection, q: &ListQuery) -> Result<Vec<TaxPayment>> {
    let mut sql = format!("SELECT {} FROM tax_payments WHERE 1=1", TAX_PAYMENT_COLUMNS);
    let binds = q.apply(&mut sql, "date");
    sql.push_str(" ORDER BY date IS NULL, date DESC, id DESC");
    sql.push_str(&q.limit_clause());
    query_list(conn, &sql, &binds, tax_payment_from_row)
}

// ---- savings ----

fn savings_settings_from_row(r: &Row<'_>) -> rusqlite::Result<SavingsSettings> {
    Ok(SavingsSettings {
        id: r.get(0)?,
        goal_amount: dec(r, 1)?,
        target_monthly: dec(r, 2)?,
        created_at: r.get(3)?,
    })
}

pub fn latest_savings_settings(conn: &Connection) -> Result<Option<SavingsSettings>> {
    Ok(conn
        .query_row(
            "SELECT id, goal_amount, target_monthly, created_at FROM savings_settings
             ORDER BY created_at DESC, id DESC LIMIT 1",
            [],
            savings_settings_from_row,
        )
        .optional()?)
}

pub fn insert_savings_settings(
    conn: &Connection,
    goal_amount: Decimal,
    target_monthly: Decimal,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO savings_settings(goal_amount, target_monthly) VALUES (?1, ?2)",
        params![goal_amount.to_string(), target_monthly.to_string()],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_savings_settings(
    conn: &Connection,
    id: i64,
    goal_amount: Decimal,
    target_monthly: Decimal,
) -> Result<()> {
    let n = conn.execute(
        "UPDATE savings_settings SET goal_amount=?1, target_monthly=?2 WHERE id=?3",
        params![goal_amount.to_string(), target_monthly.to_string(), id],
    )?;
    if n == 0 {
        return Err(LedgerError::NotFound {
            collection: Collection::SavingsSettings,
            id,
        });
    }
    Ok(())
}

const SAVINGS_COLUMNS: &str = "id, date, amount, note, created_at";

fn savings_entry_from_row(r: &Row<'_>) -> rusqlite::Result<SavingsEntry> {
    Ok(SavingsEntry {
        id: r.get(0)?,
        date: r.get(1)?,
        amount: dec(r, 2)?,
        note: r.get(3)?,
        created_at: r.get(4)?,
    })
}

pub fn insert_savings_entry(
    conn: &Connection,
    date: NaiveDate,
    amount: Decimal,
    note: Option<&str>,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO savings_entries(date, amount, note) VALUES (?1, ?2, ?3)",
        params![date, amount.to_string(), note],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_savings_entry(conn: &Connection, id: i64) -> Result<SavingsEntry> {
    conn.query_row(
        &format!("SELECT {} FROM savings_entries WHERE id=?1", SAVINGS_COLUMNS),
        params![id],
        savings_entry_from_row,
    )
    .map_err(not_found(Collection::SavingsEntries, id))
}

pub fn update_savings_entry(
    conn: &Connection,
    id: i64,
    date: NaiveDate,
    amount: Decimal,
    note: Option<&str>,
) -> Result<()> {
    let n = conn.execute(
        "UPDATE savings_entries SET date=?1, amount=?2, note=?3 WHERE id=?4",
        params![date, amount.to_string(), note, id],
    )?;
    if n == 0 {
        return Err(LedgerError::NotFound {
            collection: Collection::SavingsEntries,
            id,
        });
    }
    Ok(())
}

pub fn list_savings_entries(conn: &Connection, q: &ListQuery) -> Result<Vec<SavingsEntry>> {
    let mut sql = format!("SELECT {} FROM savings_entries WHERE 1=1", SAVINGS_COLUMNS);
    let binds = q.apply(&mut sql, "date");
    sql.push_str(" ORDER BY date DESC, id DESC");
    sql.push_str(&q.limit_clause());
    query_list(conn, &sql, &binds, savings_entry_from_row)
}

// ---- month carryovers ----

fn carryover_from_row(r: &Row<'_>) -> rusqlite::Result<MonthCarryover> {
    Ok(MonthCarryover {
        id: r.get(0)?,
        month: r.get(1)?,
        carry_in: dec(r, 2)?,
        created_at: r.get(3)?,
    })
}

pub fn get_carryover(conn: &Connection, month: &str) -> Result<Option<MonthCarryover>> {
    Ok(conn
        .query_row(
            "SELECT id, month, carry_in, created_at FROM month_carryovers WHERE month=?1",
            params![month],
            carryover_from_row,
        )
        .optional()?)
}

pub fn upsert_carryover(conn: &Connection, month: &str, carry_in: Decimal) -> Result<()> {
    conn.execute(
        "INSERT INTO month_carryovers(month, carry_in) VALUES (?1, ?2)
         ON CONFLICT(month) DO UPDATE SET carry_in=excluded.carry_in",
        params![month, carry_in.to_string()],
    )?;
    Ok(())
}

pub fn list_carryovers(conn: &Connection) -> Result<Vec<MonthCarryover>> {
    query_list(
        conn,
        "SELECT id, month, carry_in, created_at FROM month_carryovers ORDER BY month DESC",
        &[],
        carryover_from_row,
    )
}

// ---- recurring obligations ----

fn recurring_from_row(r: &Row<'_>) -> rusqlite::Result<RecurringObligation> {
    Ok(RecurringObligation {
        id: r.get(0)?,
        title: r.get(1)?,
        amount: dec(r, 2)?,
        pay_day: r.get(3)?,
        active: r.get(4)?,
        created_at: r.get(5)?,
    })
}

pub fn insert_recurring(
    conn: &Connection,
    title: &str,
    amount: Decimal,
    pay_day: u32,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO recurring_expenses(title, amount, pay_day, active) VALUES (?1, ?2, ?3, 1)",
        params![title, amount.to_string(), pay_day],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_recurring(conn: &Connection, id: i64) -> Result<RecurringObligation> {
    conn.query_row(
        "SELECT id, title, amount, pay_day, active, created_at FROM recurring_expenses WHERE id=?1",
        params![id],
        recurring_from_row,
    )
    .map_err(not_found(Collection::RecurringExpenses, id))
}

pub fn list_recurring(conn: &Connection) -> Result<Vec<RecurringObligation>> {
    query_list(
        conn,
        "SELECT id, title, amount, pay_day, active, created_at FROM recurring_expenses
         ORDER BY pay_day, id",
        &[],
        recurring_from_row,
    )
}

pub fn set_recurring_active(conn: &Connection, id: i64, active: bool) -> Result<()> {
    let n = conn.execute(
        "UPDATE recurring_expenses SET active=?1 WHERE id=?2",
        params![active, id],
    )?;
    if n == 0 {
        return Err(LedgerError::NotFound {
            collection: Collection::RecurringExpenses,
            id,
        });
    }
    Ok(())
}

fn recurring_payment_from_row(r: &Row<'_>) -> rusqlite::Result<RecurringPayment> {
    Ok(RecurringPayment {
        id: r.get(0)?,
        recurring_id: r.get(1)?,
        month: r.get(2)?,
        paid_date: r.get(3)?,
        amount: dec(r, 4)?,
        created_at: r.get(5)?,
    })
}

/// Returns `None` when the obligation already has a payment for `month`.
pub fn insert_recurring_payment(
    conn: &Connection,
    recurring_id: i64,
    month: &str,
    paid_date: NaiveDate,
    amount: Decimal,
) -> Result<Option<i64>> {
    let n = conn.execute(
        "INSERT INTO recurring_payments(recurring_id, month, paid_date, amount) VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(recurring_id, month) DO NOTHING",
        params![recurring_id, month, paid_date, amount.to_string()],
    )?;
    if n == 0 {
        return Ok(None);
    }
    Ok(Some(conn.last_insert_rowid()))
}

pub fn list_recurring_payments(
    conn: &Connection,
    month: Option<&str>,
) -> Result<Vec<RecurringPayment>> {
    let mut sql = String::from(
        "SELECT id, recurring_id, month, paid_date, amount, created_at FROM recurring_payments",
    );
    let mut binds = Vec::new();
    if let Some(m) = month {
        sql.push_str(" WHERE month=?");
        binds.push(m.to_string());
    }
    sql.push_str(" ORDER BY month DESC, id DESC");
    query_list(conn, &sql, &binds, recurring_payment_from_row)
}
