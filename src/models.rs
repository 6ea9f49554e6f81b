// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxKind {
    Income,
    Expense,
}

impl TxKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxKind::Income => "income",
            TxKind::Expense => "expense",
        }
    }
}

/// Which audit record caused a mirrored transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    LoanPayment,
    CardEvent,
    TaxPayment,
    SavingsEntry,
    RecurringPayment,
}

impl LinkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkKind::LoanPayment => "loan_payment",
            LinkKind::CardEvent => "card_event",
            LinkKind::TaxPayment => "tax_payment",
            LinkKind::SavingsEntry => "savings_entry",
            LinkKind::RecurringPayment => "recurring_payment",
        }
    }

    pub fn parse(s: &str) -> Option<LinkKind> {
        match s {
            "loan_payment" => Some(LinkKind::LoanPayment),
            "card_event" => Some(LinkKind::CardEvent),
            "tax_payment" => Some(LinkKind::TaxPayment),
            "savings_entry" => Some(LinkKind::SavingsEntry),
            "recurring_payment" => Some(LinkKind::RecurringPayment),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObligationLink {
    pub kind: LinkKind,
    pub id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub date: NaiveDate,
    pub kind: TxKind,
    pub amount: Decimal,
    pub category: String,
    /// Tri-state: `None` means not applicable (expenses, legacy rows).
    pub taxable: Option<bool>,
    pub note: Option<String>,
    pub link: Option<ObligationLink>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub kind: TxKind,
    pub amount: Decimal,
    pub category: String,
    pub taxable: Option<bool>,
    pub note: Option<String>,
    pub link: Option<ObligationLink>,
}

impl NewTransaction {
    /// An expense written alongside an obligation payment.
    pub fn mirror(
        date: NaiveDate,
        amount: Decimal,
        category: String,
        note: Option<String>,
        link: ObligationLink,
    ) -> Self {
        NewTransaction {
            date,
            kind: TxKind::Expense,
            amount,
            category,
            taxable: None,
            note,
            link: Some(link),
        }
    }
}

/// Fields an edit may change. Kind and link are fixed at creation.
#[derive(Debug, Clone, Default)]
pub struct TransactionPatch {
    pub date: Option<NaiveDate>,
    pub amount: Option<Decimal>,
    pub category: Option<String>,
    pub note: Option<Option<String>>,
    pub taxable: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loan {
    pub id: i64,
    pub title: String,
    pub balance: Decimal,
    pub opening_balance: Decimal,
    pub monthly_payment: Decimal,
    pub payment_day: u32,
    pub annual_rate: Decimal, // percent
    pub last_payment_date: Option<NaiveDate>,
    pub active: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanPayment {
    pub id: i64,
    pub loan_id: i64,
    pub payment_date: NaiveDate,
    pub payment_amount: Decimal,
    pub interest_amount: Decimal,
    pub principal_amount: Decimal,
    pub balance_before: Decimal,
    pub balance_after: Decimal,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardAccount {
    pub id: i64,
    pub title: String,
    pub balance: Decimal,
    pub opening_balance: Decimal,
    pub statement_day: u32,
    pub due_day: u32,
    pub min_payment_rate: Decimal, // fraction 0..=1
    pub active: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardEventKind {
    Interest,
    Payment,
}

impl CardEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardEventKind::Interest => "interest",
            CardEventKind::Payment => "payment",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardEvent {
    pub id: i64,
    pub card_id: i64,
    pub date: NaiveDate,
    pub kind: CardEventKind,
    pub amount: Decimal,
    pub note: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxSettings {
    pub id: i64,
    pub annual_fixed_levy: Decimal,
    pub extra_rate: Decimal, // fraction, e.g. 0.01
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxKind {
    FlatRate,
    FixedLevy,
    Progressive,
    /// Legacy payments recorded without a kind; applied against the
    /// fixed levy and progressive surcharge combined.
    Unallocated,
}

impl TaxKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaxKind::FlatRate => "flat_rate",
            TaxKind::FixedLevy => "fixed_levy",
            TaxKind::Progressive => "progressive",
            TaxKind::Unallocated => "unallocated",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxPayment {
    pub id: i64,
    pub date: Option<NaiveDate>,
    pub kind: TaxKind,
    pub amount: Decimal,
    pub note: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsSettings {
    pub id: i64,
    pub goal_amount: Decimal,
    pub target_monthly: Decimal,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsEntry {
    pub id: i64,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub note: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthCarryover {
    pub id: i64,
    pub month: String, // YYYY-MM
    pub carry_in: Decimal,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringObligation {
    pub id: i64,
    pub title: String,
    pub amount: Decimal,
    pub pay_day: u32,
    pub active: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringPayment {
    pub id: i64,
    pub recurring_id: i64,
    pub month: String, // YYYY-MM
    pub paid_date: NaiveDate,
    pub amount: Decimal,
    pub created_at: NaiveDateTime,
}
