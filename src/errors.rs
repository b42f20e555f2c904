// Copyright (c) Lodgekeep Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use thiserror::Error;

/// Domain errors raised by the ledger core. Validation errors block the
/// write that triggered them; storage failures travel separately via anyhow.
#[derive(Debug, Error, PartialEq)]
pub enum LedgerError {
    #[error("unknown currency '{0}'")]
    UnknownCurrency(String),

    #[error("invalid rate {0}: must be greater than zero")]
    InvalidRate(Decimal),

    #[error("currency '{0}' already exists")]
    DuplicateCurrency(String),

    #[error("currency '{0}' is protected and cannot be changed")]
    ProtectedCurrency(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("invalid amount {0}: must be greater than zero")]
    InvalidAmount(Decimal),

    #[error("payment currency '{payment}' does not match account currency '{account}'")]
    AccountCurrencyMismatch { account: String, payment: String },

    #[error("cannot transfer between an account and itself")]
    SameAccountTransfer,

    #[error("conversion rate {rate} invalid for same-currency transfer {from}->{to}")]
    RateMismatch {
        from: String,
        to: String,
        rate: Decimal,
    },
}

pub type LedgerResult<T> = Result<T, LedgerError>;
