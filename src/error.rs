// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

use crate::store::Collection;

#[derive(Debug, Error)]
pub enum LedgerError {
    /// Rejected user input. Nothing was written.
    #[error("{0}")]
    Validation(String),

    #[error("{collection} record {id} not found")]
    NotFound { collection: Collection, id: i64 },

    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, LedgerError>;

pub(crate) fn invalid(msg: impl Into<String>) -> LedgerError {
    LedgerError::Validation(msg.into())
}
