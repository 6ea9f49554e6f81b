// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;

use super::{Collection, dec, not_found, query_list};
use crate::error::{LedgerError, Result};
use crate::models::{CardAccount, CardEvent, CardEventKind, Loan, LoanPayment};

// ---- loans ----

#[derive(Debug, Clone)]
pub struct NewLoan {
    pub title: String,
    pub balance: Decimal,
    pub monthly_payment: Decimal,
    pub payment_day: u32,
    pub annual_rate: Decimal,
}

const LOAN_COLUMNS: &str = "id, title, balance, opening_balance, monthly_payment, payment_day, annual_rate, last_payment_date, active, created_at";

fn loan_from_row(r: &Row<'_>) -> rusqlite::Result<Loan> {
    Ok(Loan {
        id: r.get(0)?,
        title: r.get(1)?,
        balance: dec(r, 2)?,
        opening_balance: dec(r, 3)?,
        monthly_payment: dec(r, 4)?,
        payment_day: r.get(5)?,
        annual_rate: dec(r, 6)?,
        last_payment_date: r.get(7)?,
        active: r.get(8)?,
        created_at: r.get(9)?,
    })
}

pub fn insert_loan(conn: &Connection, loan: &NewLoan) -> Result<i64> {
    conn.execute(
        "INSERT INTO loans(title, balance, opening_balance, monthly_payment, payment_day, annual_rate, last_payment_date, active)
         VALUES (?1, ?2, ?2, ?3, ?4, ?5, NULL, ?6)",
        params![
            loan.title,
            loan.balance.to_string(),
            loan.monthly_payment.to_string(),
            loan.payment_day,
            loan.annual_rate.to_string(),
            loan.balance > Decimal::ZERO,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_loan(conn: &Connection, id: i64) -> Result<Loan> {
    conn.query_row(
        &format!("SELECT {} FROM loans WHERE id=?1", LOAN_COLUMNS),
        params![id],
        loan_from_row,
    )
    .map_err(not_found(Collection::Loans, id))
}

pub fn find_loan_by_title(conn: &Connection, title: &str) -> Result<Option<Loan>> {
    Ok(conn
        .query_row(
            &format!(
                "SELECT {} FROM loans WHERE title=?1 ORDER BY id DESC LIMIT 1",
                LOAN_COLUMNS
            ),
            params![title],
            loan_from_row,
        )
        .optional()?)
}

pub fn list_loans(conn: &Connection) -> Result<Vec<Loan>> {
    query_list(
        conn,
        &format!(
            "SELECT {} FROM loans ORDER BY created_at DESC, id DESC",
            LOAN_COLUMNS
        ),
        &[],
        loan_from_row,
    )
}

pub fn update_loan_state(
    conn: &Connection,
    id: i64,
    balance: Decimal,
    last_payment_date: Option<NaiveDate>,
    active: bool,
) -> Result<()> {
    let n = conn.execute(
        "UPDATE loans SET balance=?1, last_payment_date=?2, active=?3 WHERE id=?4",
        params![balance.to_string(), last_payment_date, active, id],
    )?;
    if n == 0 {
        return Err(LedgerError::NotFound {
            collection: Collection::Loans,
            id,
        });
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct NewLoanPayment {
    pub loan_id: i64,
    pub payment_date: NaiveDate,
    pub payment_amount: Decimal,
    pub interest_amount: Decimal,
    pub principal_amount: Decimal,
    pub balance_before: Decimal,
    pub balance_after: Decimal,
}

fn loan_payment_from_row(r: &Row<'_>) -> rusqlite::Result<LoanPayment> {
    Ok(LoanPayment {
        id: r.get(0)?,
        loan_id: r.get(1)?,
        payment_date: r.get(2)?,
        payment_amount: dec(r, 3)?,
        interest_amount: dec(r, 4)?,
        principal_amount: dec(r, 5)?,
        balance_before: dec(r, 6)?,
        balance_after: dec(r, 7)?,
        created_at: r.get(8)?,
    })
}

pub fn insert_loan_payment(conn: &Connection, p: &NewLoanPayment) -> Result<i64> {
    conn.execute(
        "INSERT INTO loan_payments(loan_id, payment_date, payment_amount, interest_amount, principal_amount, balance_before, balance_after)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            p.loan_id,
            p.payment_date,
            p.payment_amount.to_string(),
            p.interest_amount.to_string(),
            p.principal_amount.to_string(),
            p.balance_before.to_string(),
            p.balance_after.to_string(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Newest first; all loans when `loan_id` is `None`.
pub fn list_loan_payments(conn: &Connection, loan_id: Option<i64>) -> Result<Vec<LoanPayment>> {
    let mut sql = String::from(
        "SELECT id, loan_id, payment_date, payment_amount, interest_amount, principal_amount, balance_before, balance_after, created_at
         FROM loan_payments",
    );
    let mut binds = Vec::new();
    if let Some(id) = loan_id {
        sql.push_str(" WHERE loan_id=?");
        binds.push(id.to_string());
    }
    sql.push_str(" ORDER BY payment_date DESC, id DESC");
    query_list(conn, &sql, &binds, loan_payment_from_row)
}

// ---- credit cards ----

#[derive(Debug, Clone)]
pub struct NewCard {
    pub title: String,
    pub balance: Decimal,
    pub statement_day: u32,
    pub due_day: u32,
    pub min_payment_rate: Decimal,
}

const CARD_COLUMNS: &str = "id, title, balance, opening_balance, statement_day, due_day, min_payment_rate, active, created_at";

fn card_from_row(r: &Row<'_>) -> rusqlite::Result<CardAccount> {
    Ok(CardAccount {
        id: r.get(0)?,
        title: r.get(1)?,
        balance: dec(r, 2)?,
        opening_balance: dec(r, 3)?,
        statement_day: r.get(4)?,
        due_day: r.get(5)?,
        min_payment_rate: dec(r, 6)?,
        active: r.get(7)?,
        created_at: r.get(8)?,
    })
}

pub fn insert_card(conn: &Connection, card: &NewCard) -> Result<i64> {
    conn.execute(
        "INSERT INTO card_accounts(title, balance, opening_balance, statement_day, due_day, min_payment_rate, active)
         VALUES (?1, ?2, ?2, ?3, ?4, ?5, 1)",
        params![
            card.title,
            card.balance.to_string(),
            card.statement_day,
            card.due_day,
            card.min_payment_rate.to_string(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_card(conn: &Connection, id: i64) -> Result<CardAccount> {
    conn.query_row(
        &format!("SELECT {} FROM card_accounts WHERE id=?1", CARD_COLUMNS),
        params![id],
        card_from_row,
    )
    .map_err(not_found(Collection::CardAccounts, id))
}

pub fn find_card_by_title(conn: &Connection, title: &str) -> Result<Option<CardAccount>> {
    Ok(conn
        .query_row(
            &format!(
                "SELECT {} FROM card_accounts WHERE title=?1 ORDER BY id DESC LIMIT 1",
                CARD_COLUMNS
            ),
            params![title],
            card_from_row,
        )
        .optional()?)
}

pub fn list_cards(conn: &Connection) -> Result<Vec<CardAccount>> {
    query_list(
        conn,
        &format!(
            "SELECT {} FROM card_accounts ORDER BY created_at DESC, id DESC",
            CARD_COLUMNS
        ),
        &[],
        card_from_row,
    )
}

pub fn update_card_state(conn: &Connection, id: i64, balance: Decimal, active: bool) -> Result<()> {
    let n = conn.execute(
        "UPDATE card_accounts SET balance=?1, active=?2 WHERE id=?3",
        params![balance.to_string(), active, id],
    )?;
    if n == 0 {
        return Err(LedgerError::NotFound {
            collection: Collection::CardAccounts,
            id,
        });
    }
    Ok(())
}

fn card_event_from_row(r: &Row<'_>) -> rusqlite::Result<CardEvent> {
    let kind: String = r.get(3)?;
    Ok(CardEvent {
        id: r.get(0)?,
        card_id: r.get(1)?,
        date: r.get(2)?,
        kind: if kind == "interest" {
            CardEventKind::Interest
        } else {
            CardEventKind::Payment
        },
        amount: dec(r, 4)?,
        note: r.get(5)?,
        created_at: r.get(6)?,
    })
}

pub fn insert_card_event(
    conn: &Connection,
    card_id: i64,
    date: NaiveDate,
    kind: CardEventKind,
    amount: Decimal,
    note: Option<&str>,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO card_events(card_id, date, kind, amount, note) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![card_id, date, kind.as_str(), amount.to_string(), note],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Newest first; all cards when `card_id` is `None`.
pub fn list_card_events(conn: &Connection, card_id: Option<i64>) -> Result<Vec<CardEvent>> {
    let mut sql =
        String::from("SELECT id, card_id, date, kind, amount, note, created_at FROM card_events");
    let mut binds = Vec::new();
    if let Some(id) = card_id {
        sql.push_str(" WHERE card_id=?");
        binds.push(id.to_string());
    }
    sql.push_str(" ORDER BY date DESC, id DESC");
    query_list(conn, &sql, &binds, card_event_from_row)
}
