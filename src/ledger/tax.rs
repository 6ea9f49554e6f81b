// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::{require_non_negative, require_positive, require_range};
use crate::engine::tax::DEFAULT_EXTRA_RATE;
use crate::error::{LedgerError, Result};
use crate::models::{LinkKind, NewTransaction, ObligationLink, TaxKind, TaxSettings};
use crate::store::{self, Collection, Store};

/// Returns the settings row, creating it with (0, 0.01) on first use.
pub fn ensure_settings(store: &Store) -> Result<TaxSettings> {
    if let Some(s) = store::latest_tax_settings(store.conn())? {
        return Ok(s);
    }
    store.write(&[Collection::TaxSettings], |conn| {
        let id = store::insert_tax_settings(conn, Decimal::ZERO, DEFAULT_EXTRA_RATE)?;
        tracing::info!(id, "tax settings created with defaults");
        store::latest_tax_settings(conn)?.ok_or(LedgerError::NotFound {
            collection: Collection::TaxSettings,
            id,
        })
    })
}

pub fn update_settings(
    store: &Store,
    annual_fixed_levy: Decimal,
    extra_rate: Decimal,
) -> Result<TaxSettings> {
    require_non_negative(annual_fixed_levy, "annual fixed levy")?;
    require_range(extra_rate, Decimal::ZERO, Decimal::ONE, "extra rate")?;
    let current = ensure_settings(store)?;
    store.write(&[Collection::TaxSettings], |conn| {
        store::update_tax_settings(conn, current.id, annual_fixed_levy, extra_rate)
    })?;
    tracing::info!(levy = %annual_fixed_levy, rate = %extra_rate, "tax settings updated");
    Ok(TaxSettings {
        annual_fixed_levy,
        extra_rate,
        ..current
    })
}

fn mirror_category(kind: TaxKind) -> String {
    format!("Taxes ({})", kind.as_str())
}

#[derive(Debug, Clone, Copy)]
pub struct TaxPaymentReceipt {
    pub payment_id: i64,
    /// `None` for undated payments, which never reach the ledger.
    pub transaction_id: Option<i64>,
}

/// Records a manual tax payment. Dated payments are mirrored as an expense.
pub fn record_payment(
    store: &Store,
    date: Option<NaiveDate>,
    kind: TaxKind,
    amount: Decimal,
    note: Option<&str>,
) -> Result<TaxPaymentReceipt> {
    require_positive(amount, "tax payment amount")?;
    let receipt = store.write(&[Collection::TaxPayments, Collection::Transactions], |conn| {
        let payment_id = store::insert_tax_payment(conn, date, kind, amount, note)?;
        let transaction_id = match date {
            Some(d) => Some(store::insert_transaction(
                conn,
                &NewTransaction::mirror(
                    d,
                    amount,
                    mirror_category(kind),
                    note.map(str::to_string),
                    ObligationLink {
                        kind: LinkKind::TaxPayment,
                        id: payment_id,
                    },
                ),
            )?),
            None => None,
        };
        Ok(TaxPaymentReceipt {
            payment_id,
            transaction_id,
        })
    })?;
    tracing::info!(id = receipt.payment_id, kind = kind.as_str(), amount = %amount, "tax payment recorded");
    Ok(receipt)
}

/// Deletes the payment together with its mirrored expense.
pub fn delete_payment(store: &Store, id: i64) -> Result<()> {
    store.write(&[Collection::TaxPayments, Collection::Transactions], |conn| {
        store::delete(conn, Collection::TaxPayments, id)?;
        store::delete_mirror(
            conn,
            ObligationLink {
                kind: LinkKind::TaxPayment,
                id,
            },
        )?;
        Ok(())
    })?;
    tracing::info!(id, "tax payment deleted");
    Ok(())
}
