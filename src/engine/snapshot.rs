// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use std::collections::BTreeSet;

use crate::config::Settings;
use crate::error::Result;
use crate::models::{
    CardAccount, CardEvent, Loan, LoanPayment, MonthCarryover, RecurringObligation,
    RecurringPayment, SavingsEntry, SavingsSettings, TaxPayment, TaxSettings, Transaction,
};
use crate::store::{self, Collection, ListQuery};

/// Every collection as it stood at `version`. Never mutated after load.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub version: u64,
    pub settings: Settings,
    pub transactions: Vec<Transaction>,
    pub loans: Vec<Loan>,
    pub loan_payments: Vec<LoanPayment>,
    pub cards: Vec<CardAccount>,
    pub card_events: Vec<CardEvent>,
    pub tax_settings: Option<TaxSettings>,
    pub tax_payments: Vec<TaxPayment>,
    pub savings_settings: Option<SavingsSettings>,
    pub savings_entries: Vec<SavingsEntry>,
    pub carryovers: Vec<MonthCarryover>,
    pub recurring: Vec<RecurringObligation>,
    pub recurring_payments: Vec<RecurringPayment>,
}

impl Snapshot {
    pub fn load(conn: &Connection) -> Result<Snapshot> {
        let all: BTreeSet<Collection> = Collection::ALL.into_iter().collect();
        Snapshot::default().reload(conn, &all)
    }

    /// A new snapshot with `dirty` collections re-read and the rest shared
    /// from `self`.
    pub fn reload(&self, conn: &Connection, dirty: &BTreeSet<Collection>) -> Result<Snapshot> {
        let mut next = self.clone();
        next.version = self.version + 1;
        for c in dirty {
            tracing::debug!(collection = %c, version = next.version, "reloading");
            match c {
                Collection::Settings => next.settings = Settings::load(conn)?,
                Collection::Transactions => {
                    next.transactions = store::list_transactions(conn, &ListQuery::all())?
                }
                Collection::Loans => next.loans = store::list_loans(conn)?,
                Collection::LoanPayments => {
                    next.loan_payments = store::list_loan_payments(conn, None)?
                }
                Collection::CardAccounts => next.cards = store::list_cards(conn)?,
                Collection::CardEvents => next.card_events = store::list_card_events(conn, None)?,
                Collection::TaxSettings => next.tax_settings = store::latest_tax_settings(conn)?,
                Collection::TaxPayments => {
                    next.tax_payments = store::list_tax_payments(conn, &ListQuery::all())?
                }
                Collection::SavingsSettings => {
                    next.savings_settings = store::latest_savings_settings(conn)?
                }
                Collection::SavingsEntries => {
                    next.savings_entries = store::list_savings_entries(conn, &ListQuery::all())?
                }
                Collection::MonthCarryovers => next.carryovers = store::list_carryovers(conn)?,
                Collection::RecurringExpenses => next.recurring = store::list_recurring(conn)?,
                Collection::RecurringPayments => {
                    next.recurring_payments = store::list_recurring_payments(conn, None)?
                }
            }
        }
        Ok(next)
    }

    pub fn carry_in(&self, month: &str) -> rust_decimal::Decimal {
        self.carryovers
            .iter()
            .find(|c| c.month == month)
            .map(|c| c.carry_in)
            .unwrap_or_default()
    }
}
