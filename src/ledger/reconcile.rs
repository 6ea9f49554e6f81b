// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Balance drift detection.
//!
//! Loan and card balances are adjusted forward on every event and never
//! recomputed on read. The event logs are the authority: replaying them from
//! the opening balance must give the stored balance.

use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::engine::{cards, loans};
use crate::error::Result;
use crate::models::LinkKind;
use crate::store::{self, Collection, Store, query_list};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Drift {
    pub collection: String,
    pub id: i64,
    pub title: String,
    pub stored: Decimal,
    pub rebuilt: Decimal,
}

/// A mirrored expense whose source record is gone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrphanMirror {
    pub transaction_id: i64,
    pub link_kind: String,
    pub link_id: i64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconcileReport {
    pub drift: Vec<Drift>,
    pub orphan_mirrors: Vec<OrphanMirror>,
    pub repaired: bool,
}

impl ReconcileReport {
    pub fn is_clean(&self) -> bool {
        self.drift.is_empty() && self.orphan_mirrors.is_empty()
    }
}

const LINK_KINDS: [LinkKind; 5] = [
    LinkKind::LoanPayment,
    LinkKind::CardEvent,
    LinkKind::TaxPayment,
    LinkKind::SavingsEntry,
    LinkKind::RecurringPayment,
];

fn orphan_mirrors(conn: &Connection) -> Result<Vec<OrphanMirror>> {
    let mut out = Vec::new();
    for kind in LINK_KINDS {
        let sql = format!(
            "SELECT t.id, t.link_kind, t.link_id FROM transactions t
             WHERE t.link_kind=? AND NOT EXISTS (SELECT 1 FROM {} s WHERE s.id=t.link_id)
             ORDER BY t.id",
            store::link_source(kind).table()
        );
        out.extend(query_list(conn, &sql, &[kind.as_str().to_string()], |r| {
            Ok(OrphanMirror {
                transaction_id: r.get(0)?,
                link_kind: r.get(1)?,
                link_id: r.get(2)?,
            })
        })?);
    }
    Ok(out)
}

fn find_drift(conn: &Connection) -> Result<Vec<Drift>> {
    let mut drift = Vec::new();
    let payments = store::list_loan_payments(conn, None)?;
    for loan in store::list_loans(conn)? {
        let rebuilt = loans::rebuild_balance(&loan, &payments);
        if rebuilt != loan.balance {
            drift.push(Drift {
                collection: Collection::Loans.to_string(),
                id: loan.id,
                title: loan.title.clone(),
                stored: loan.balance,
                rebuilt,
            });
        }
    }
    let events = store::list_card_events(conn, None)?;
    for card in store::list_cards(conn)? {
        let rebuilt = cards::rebuild_balance(&card, &events);
        if rebuilt != card.balance {
            drift.push(Drift {
                collection: Collection::CardAccounts.to_string(),
                id: card.id,
                title: card.title.clone(),
                stored: card.balance,
                rebuilt,
            });
        }
    }
    Ok(drift)
}

/// Reports drift and orphaned mirrors. With `apply`, stored balances are
/// overwritten by the rebuilt ones. Orphans are only reported.
pub fn reconcile(store: &Store, apply: bool) -> Result<ReconcileReport> {
    let mut report = ReconcileReport {
        drift: find_drift(store.conn())?,
        orphan_mirrors: orphan_mirrors(store.conn())?,
        repaired: false,
    };
    if apply && !report.drift.is_empty() {
        let drift = report.drift.clone();
        store.write(&[Collection::Loans, Collection::CardAccounts], |conn| {
            for d in &drift {
                let active = d.rebuilt > Decimal::ZERO;
                if d.collection == Collection::Loans.table() {
                    let loan = store::get_loan(conn, d.id)?;
                    store::update_loan_state(conn, d.id, d.rebuilt, loan.last_payment_date, active)?;
                } else {
                    store::update_card_state(conn, d.id, d.rebuilt, active)?;
                }
            }
            Ok(())
        })?;
        report.repaired = true;
        tracing::info!(count = report.drift.len(), "balances rebuilt from event logs");
    }
    Ok(report)
}
