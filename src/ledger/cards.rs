// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::{require_day, require_non_negative, require_positive, require_range, require_title};
use crate::engine::cards::{self, CardUpdate};
use crate::error::Result;
use crate::models::{CardEventKind, LinkKind, NewTransaction, ObligationLink};
use crate::store::{self, Collection, NewCard, Store};

pub fn add_card(store: &Store, card: NewCard) -> Result<i64> {
    let title = require_title(&card.title)?;
    require_non_negative(card.balance, "balance")?;
    require_day(card.statement_day, "statement day")?;
    require_day(card.due_day, "due day")?;
    require_range(
        card.min_payment_rate,
        Decimal::ZERO,
        Decimal::ONE,
        "minimum payment rate",
    )?;
    let card = NewCard { title, ..card };
    let id = store.write(&[Collection::CardAccounts], |conn| {
        store::insert_card(conn, &card)
    })?;
    tracing::info!(id, title = %card.title, balance = %card.balance, "card added");
    Ok(id)
}

#[derive(Debug, Clone, Serialize)]
pub struct CardReceipt {
    pub card_id: i64,
    pub event_id: i64,
    /// Only set for payments.
    pub transaction_id: Option<i64>,
    pub update: CardUpdate,
}

/// Interest raises the balance. It is not spending, so nothing is mirrored.
pub fn accrue_interest(
    store: &Store,
    card_id: i64,
    amount: Decimal,
    date: NaiveDate,
    note: Option<&str>,
) -> Result<CardReceipt> {
    require_positive(amount, "interest amount")?;
    let receipt = store.write(&[Collection::CardAccounts, Collection::CardEvents], |conn| {
        let card = store::get_card(conn, card_id)?;
        let update = cards::accrue(card.balance, amount)?;
        let event_id =
            store::insert_card_event(conn, card.id, date, CardEventKind::Interest, amount, note)?;
        store::update_card_state(conn, card.id, update.balance_after, update.active)?;
        Ok(CardReceipt {
            card_id: card.id,
            event_id,
            transaction_id: None,
            update,
        })
    })?;
    tracing::info!(card_id, amount = %amount, balance = %receipt.update.balance_after, "card interest accrued");
    Ok(receipt)
}

/// A payment lowers the balance (never below zero) and always mirrors the
/// full amount paid as one expense.
pub fn record_payment(
    store: &Store,
    card_id: i64,
    amount: Decimal,
    date: NaiveDate,
    note: Option<&str>,
) -> Result<CardReceipt> {
    require_positive(amount, "payment amount")?;
    let receipt = store.write(
        &[
            Collection::CardAccounts,
            Collection::CardEvents,
            Collection::Transactions,
        ],
        |conn| {
            let card = store::get_card(conn, card_id)?;
            let update = cards::pay(card.balance, amount);
            let event_id =
                store::insert_card_event(conn, card.id, date, CardEventKind::Payment, amount, note)?;
            store::update_card_state(conn, card.id, update.balance_after, update.active)?;
            let transaction_id = store::insert_transaction(
                conn,
                &NewTransaction::mirror(
                    date,
                    amount,
                    format!("Card: {}", card.title),
                    note.map(str::to_string),
                    ObligationLink {
                        kind: LinkKind::CardEvent,
                        id: event_id,
                    },
                ),
            )?;
            Ok(CardReceipt {
                card_id: card.id,
                event_id,
                transaction_id: Some(transaction_id),
                update,
            })
        },
    )?;
    tracing::info!(card_id, amount = %amount, balance = %receipt.update.balance_after, "card payment recorded");
    Ok(receipt)
}

/// Removes the card and its event log. Mirrored expenses stay in the ledger.
pub fn delete_card(store: &Store, card_id: i64) -> Result<()> {
    store.write(&[Collection::CardAccounts, Collection::CardEvents], |conn| {
        store::delete(conn, Collection::CardAccounts, card_id)
    })?;
    tracing::info!(card_id, "card deleted");
    Ok(())
}
