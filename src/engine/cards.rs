// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::collections::HashSet;

use super::period::{Period, next_day_of_month};
use crate::error::{Result, invalid};
use crate::models::{CardAccount, CardEvent, CardEventKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CardUpdate {
    pub balance_before: Decimal,
    pub balance_after: Decimal,
    /// How much of the balance actually moved.
    pub applied: Decimal,
    pub active: bool,
}

/// Interest raises the debt. No cash moves, so nothing is mirrored.
pub fn accrue(balance: Decimal, amount: Decimal) -> Result<CardUpdate> {
    let after = balance
        .checked_add(amount)
        .ok_or_else(|| invalid("card balance is out of range"))?;
    Ok(CardUpdate {
        balance_before: balance,
        balance_after: after,
        applied: amount,
        active: true,
    })
}

/// A payment lowers the debt, never below zero.
pub fn pay(balance: Decimal, amount: Decimal) -> CardUpdate {
    let after = (balance - amount).max(Decimal::ZERO);
    CardUpdate {
        balance_before: balance,
        balance_after: after,
        applied: balance - after,
        active: after > Decimal::ZERO,
    }
}

pub fn apply(balance: Decimal, event: &CardEvent) -> Decimal {
    match event.kind {
        CardEventKind::Interest => balance.saturating_add(event.amount),
        CardEventKind::Payment => pay(balance, event.amount).balance_after,
    }
}

pub fn minimum_payment(card: &CardAccount) -> Decimal {
    (card.balance * card.min_payment_rate)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Months (`YYYY-MM`) in which `card_id` received at least one payment.
pub fn payment_months(events: &[CardEvent], card_id: i64) -> HashSet<String> {
    events
        .iter()
        .filter(|e| e.card_id == card_id && e.kind == CardEventKind::Payment)
        .map(|e| Period::month_of(e.date).key())
        .collect()
}

pub fn paid_in_month(events: &[CardEvent], card_id: i64, month: &Period) -> bool {
    payment_months(events, card_id).contains(&month.key())
}

/// Balance implied by the event log, replayed in the order the events were
/// recorded (payments floor at zero, so dates alone do not fix the result).
pub fn rebuild_balance(card: &CardAccount, events: &[CardEvent]) -> Decimal {
    let mut ordered: Vec<&CardEvent> = events.iter().filter(|e| e.card_id == card.id).collect();
    ordered.sort_by_key(|e| e.id);
    ordered
        .into_iter()
        .fold(card.opening_balance, |bal, e| apply(bal, e))
}

#[derive(Debug, Clone, Serialize)]
pub struct CardStatus {
    pub card: CardAccount,
    pub minimum_payment: Decimal,
    pub next_due: NaiveDate,
    pub paid_this_month: bool,
}

pub fn status(card: &CardAccount, events: &[CardEvent], today: NaiveDate) -> CardStatus {
    CardStatus {
        card: card.clone(),
        minimum_payment: minimum_payment(card),
        next_due: next_day_of_month(card.due_day, today),
        paid_this_month: paid_in_month(events, card.id, &Period::month_of(today)),
    }
}
