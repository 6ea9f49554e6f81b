// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

use super::{require_non_negative, require_positive};
use crate::config::Settings;
use crate::engine::savings::{DEFAULT_GOAL, SavingsProjection};
use crate::error::{LedgerError, Result, invalid};
use crate::models::{
    LinkKind, NewTransaction, ObligationLink, SavingsSettings, TransactionPatch,
};
use crate::store::{self, Collection, ListQuery, Store};

pub const MIRROR_CATEGORY: &str = "Savings";

fn link(id: i64) -> ObligationLink {
    ObligationLink {
        kind: LinkKind::SavingsEntry,
        id,
    }
}

/// Returns the settings row, creating it with (1 000 000, 0) on first use.
pub fn ensure_settings(store: &Store) -> Result<SavingsSettings> {
    if let Some(s) = store::latest_savings_settings(store.conn())? {
        return Ok(s);
    }
    store.write(&[Collection::SavingsSettings], |conn| {
        let id = store::insert_savings_settings(conn, DEFAULT_GOAL, Decimal::ZERO)?;
        tracing::info!(id, "savings settings created with defaults");
        store::latest_savings_settings(conn)?.ok_or(LedgerError::NotFound {
            collection: Collection::SavingsSettings,
            id,
        })
    })
}

pub fn update_settings(
    store: &Store,
    goal_amount: Decimal,
    target_monthly: Decimal,
) -> Result<SavingsSettings> {
    require_positive(goal_amount, "goal amount")?;
    require_non_negative(target_monthly, "monthly target")?;
    let current = ensure_settings(store)?;
    store.write(&[Collection::SavingsSettings], |conn| {
        store::update_savings_settings(conn, current.id, goal_amount, target_monthly)
    })?;
    tracing::info!(goal = %goal_amount, target = %target_monthly, "savings settings updated");
    Ok(SavingsSettings {
        goal_amount,
        target_monthly,
        ..current
    })
}

#[derive(Debug, Clone, Copy)]
pub struct SavingsReceipt {
    pub entry_id: i64,
    pub transaction_id: Option<i64>,
}

/// Records a contribution, mirrored as an expense when `mirror_savings` is on.
pub fn add_entry(
    store: &Store,
    date: NaiveDate,
    amount: Decimal,
    note: Option<&str>,
) -> Result<SavingsReceipt> {
    require_positive(amount, "savings amount")?;
    let mirror = Settings::load(store.conn())?.mirror_savings;
    let receipt = store.write(
        &[Collection::SavingsEntries, Collection::Transactions],
        |conn| {
            let entry_id = store::insert_savings_entry(conn, date, amount, note)?;
            let transaction_id = if mirror {
                Some(store::insert_transaction(
                    conn,
                    &NewTransaction::mirror(
                        date,
                        amount,
                        MIRROR_CATEGORY.to_string(),
                        note.map(str::to_string),
                        link(entry_id),
                    ),
                )?)
            } else {
                None
            };
            Ok(SavingsReceipt {
                entry_id,
                transaction_id,
            })
        },
    )?;
    tracing::info!(id = receipt.entry_id, amount = %amount, mirrored = mirror, "savings entry recorded");
    Ok(receipt)
}

/// Saves today's recommended contribution, rounded to a whole unit.
pub fn add_recommended_today(store: &Store, today: NaiveDate) -> Result<SavingsReceipt> {
    let settings = store::latest_savings_settings(store.conn())?;
    let entries = store::list_savings_entries(store.conn(), &ListQuery::all())?;
    let projection = SavingsProjection::compute(settings.as_ref(), &entries, today);
    let amount = projection
        .recommended_daily
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    if amount <= Decimal::ZERO {
        return Err(invalid("nothing left to save this month"));
    }
    add_entry(store, today, amount, Some("recommended"))
}

/// Rewrites an entry and keeps its mirrored expense in step.
pub fn edit_entry(
    store: &Store,
    id: i64,
    date: NaiveDate,
    amount: Decimal,
    note: Option<&str>,
) -> Result<()> {
    require_positive(amount, "savings amount")?;
    store.write(
        &[Collection::SavingsEntries, Collection::Transactions],
        |conn| {
            store::update_savings_entry(conn, id, date, amount, note)?;
            if let Some(tx) = store::find_mirror(conn, link(id))? {
                store::update_transaction(
                    conn,
                    tx.id,
                    &TransactionPatch {
                        date: Some(date),
                        amount: Some(amount),
                        note: Some(note.map(str::to_string)),
                        ..TransactionPatch::default()
                    },
                )?;
            }
            Ok(())
        },
    )?;
    tracing::info!(id, amount = %amount, "savings entry edited");
    Ok(())
}

/// Deletes the entry together with its mirrored expense.
pub fn delete_entry(store: &Store, id: i64) -> Result<()> {
    store.write(
        &[Collection::SavingsEntries, Collection::Transactions],
        |conn| {
            store::delete(conn, Collection::SavingsEntries, id)?;
            store::delete_mirror(conn, link(id))?;
            Ok(())
        },
    )?;
    tracing::info!(id, "savings entry deleted");
    Ok(())
}
