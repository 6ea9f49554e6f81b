// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Pure derivation over a [`Snapshot`] of the store.
//!
//! The calculators in the submodules never touch the database. [`Engine`]
//! keeps the latest snapshot, learns about writes through store
//! subscriptions, re-reads only the collections that changed and memoizes
//! the derived [`Dashboard`].

pub mod budget;
pub mod cards;
pub mod loans;
pub mod normalize;
pub mod period;
pub mod recurring;
pub mod savings;
pub mod snapshot;
pub mod tax;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use crate::error::Result;
use crate::store::{Collection, Store};
use budget::{BudgetInputs, BudgetPolicy, BudgetReport};
use cards::CardStatus;
use loans::LoanStatus;
use period::{Period, expense_in, income_in, taxable_income_in};
use recurring::RecurringStatus;
use savings::SavingsProjection;
use snapshot::Snapshot;
use tax::TaxReport;

/// Every derived figure for one day.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub today: NaiveDate,
    pub month: String,
    pub income_month: Decimal,
    pub expense_month: Decimal,
    pub taxable_income_month: Decimal,
    pub carry_in: Decimal,
    pub loan_obligations: Decimal,
    pub tax: TaxReport,
    pub savings: SavingsProjection,
    pub budget: BudgetReport,
    pub loans: Vec<LoanStatus>,
    pub cards: Vec<CardStatus>,
    pub recurring: Vec<RecurringStatus>,
    /// Reported beside the budget, not subtracted by it.
    pub recurring_unpaid: Decimal,
}

impl Dashboard {
    pub fn derive(snap: &Snapshot, today: NaiveDate, policy: BudgetPolicy) -> Dashboard {
        let month = Period::month_of(today);
        let income_month = income_in(&snap.transactions, &month);
        let expense_month = expense_in(&snap.transactions, &month);

        let tax = TaxReport::compute(
            snap.tax_settings.as_ref(),
            &snap.transactions,
            &snap.tax_payments,
            today,
        );
        let savings = SavingsProjection::compute(
            snap.savings_settings.as_ref(),
            &snap.savings_entries,
            today,
        );
        let loan_obligations = loans::monthly_obligations(&snap.loans);
        let carry_in = snap.carry_in(&month.key());

        let inputs = BudgetInputs {
            planned_income: snap.settings.planned_income,
            income_month,
            expense_month,
            flat_tax_reserve_month: tax.flat_rate_reserve_month,
            loan_obligations,
            tax_monthly_reserve: tax.monthly_reserve,
            target_monthly: savings.target_monthly,
            saved_this_month: savings.saved_this_month,
            carry_in,
            savings_mirrored: snap.settings.mirror_savings,
        };
        let budget = BudgetReport::compute(policy, &inputs, today);

        let recurring = recurring::statuses(&snap.recurring, &snap.recurring_payments, today);
        let recurring_unpaid = recurring::unpaid_total(&recurring);

        Dashboard {
            today,
            month: month.key(),
            income_month,
            expense_month,
            taxable_income_month: taxable_income_in(&snap.transactions, &month),
            carry_in,
            loan_obligations,
            tax,
            savings,
            budget,
            loans: snap
                .loans
                .iter()
                .map(|l| loans::status(l, &snap.loan_payments, today))
                .collect(),
            cards: snap
                .cards
                .iter()
                .map(|c| cards::status(c, &snap.card_events, today))
                .collect(),
            recurring,
            recurring_unpaid,
        }
    }
}

type MemoKey = (u64, NaiveDate, BudgetPolicy);

pub struct Engine<'s> {
    store: &'s Store,
    snapshot: RefCell<Option<Rc<Snapshot>>>,
    dirty: Rc<RefCell<BTreeSet<Collection>>>,
    memo: RefCell<Option<(MemoKey, Rc<Dashboard>)>>,
}

impl<'s> Engine<'s> {
    pub fn new(store: &'s Store) -> Self {
        let dirty: Rc<RefCell<BTreeSet<Collection>>> = Rc::new(RefCell::new(BTreeSet::new()));
        for c in Collection::ALL {
            let d = Rc::clone(&dirty);
            store.subscribe(c, move |changed| {
                d.borrow_mut().insert(changed);
            });
        }
        Engine {
            store,
            snapshot: RefCell::new(None),
            dirty,
            memo: RefCell::new(None),
        }
    }

    /// The latest snapshot, re-reading whatever changed since the last call.
    pub fn snapshot(&self) -> Result<Rc<Snapshot>> {
        let current = self.snapshot.borrow().clone();
        let dirty: BTreeSet<Collection> = self.dirty.borrow().clone();
        let next = match current {
            None => Rc::new(Snapshot::load(self.store.conn())?),
            Some(snap) if dirty.is_empty() => return Ok(snap),
            Some(snap) => Rc::new(snap.reload(self.store.conn(), &dirty)?),
        };
        // only forget the dirty set once the reload succeeded
        self.dirty.borrow_mut().clear();
        *self.snapshot.borrow_mut() = Some(Rc::clone(&next));
        Ok(next)
    }

    /// Dashboard under the configured budget policy.
    pub fn dashboard(&self, today: NaiveDate) -> Result<Rc<Dashboard>> {
        let policy = self.snapshot()?.settings.budget_policy;
        self.dashboard_with(today, policy)
    }

    pub fn dashboard_with(&self, today: NaiveDate, policy: BudgetPolicy) -> Result<Rc<Dashboard>> {
        let snap = self.snapshot()?;
        let key = (snap.version, today, policy);
        if let Some((k, d)) = self.memo.borrow().as_ref() {
            if *k == key {
                tracing::debug!(version = snap.version, "dashboard cache hit");
                return Ok(Rc::clone(d));
            }
        }
        let dash = Rc::new(Dashboard::derive(&snap, today, policy));
        *self.memo.borrow_mut() = Some((key, Rc::clone(&dash)));
        Ok(dash)
    }
}
