// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::period::{Period, next_day_of_month};
use crate::models::{RecurringObligation, RecurringPayment};

#[derive(Debug, Clone, Serialize)]
pub struct RecurringStatus {
    pub obligation: RecurringObligation,
    pub payment: Option<RecurringPayment>,
    pub next_due: NaiveDate,
}

impl RecurringStatus {
    pub fn is_paid(&self) -> bool {
        self.payment.is_some()
    }
}

/// Status of every active obligation for the month containing `today`.
pub fn statuses(
    obligations: &[RecurringObligation],
    payments: &[RecurringPayment],
    today: NaiveDate,
) -> Vec<RecurringStatus> {
    let month = Period::month_of(today).key();
    obligations
        .iter()
        .filter(|o| o.active)
        .map(|o| RecurringStatus {
            obligation: o.clone(),
            payment: payments
                .iter()
                .find(|p| p.recurring_id == o.id && p.month == month)
                .cloned(),
            next_due: next_day_of_month(o.pay_day, today),
        })
        .collect()
}

pub fn unpaid_total(statuses: &[RecurringStatus]) -> Decimal {
    statuses
        .iter()
        .filter(|s| !s.is_paid())
        .map(|s| s.obligation.amount)
        .sum()
}
