// Copyright (c) Lodgekeep Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::errors::{LedgerError, LedgerResult};
use crate::models::{AccountTransfer, Expense, Income, LedgerAccount};
use rust_decimal::Decimal;
use serde::Serialize;

/// Current balance of an account, folded from the full transaction set on
/// every call. Balances are never stored; recomputing from the ledger keeps
/// the figure consistent with the underlying records at all times.
pub fn current_balance(
    account: &LedgerAccount,
    incomes: &[Income],
    expenses: &[Expense],
    transfers_in: &[AccountTransfer],
    transfers_out: &[AccountTransfer],
) -> Decimal {
    let mut balance = account.initial_balance;
    for t in incomes {
        balance += t.amount;
    }
    for t in expenses {
        balance -= t.amount;
    }
    for t in transfers_in {
        balance += t.amount * t.conversion_rate;
    }
    for t in transfers_out {
        balance -= t.amount;
    }
    balance
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LegKind {
    Income,
    Expense,
    TransferIn,
    TransferOut,
}

impl LegKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LegKind::Income => "income",
            LegKind::Expense => "expense",
            LegKind::TransferIn => "transfer in",
            LegKind::TransferOut => "transfer out",
        }
    }
}

/// One side of a financial movement as it affects a single account.
/// `amount` is the signed effect on the balance; `seq` is the source row id,
/// used to break ties between legs created in the same second.
#[derive(Debug, Clone, Serialize)]
pub struct Leg {
    pub kind: LegKind,
    pub amount: Decimal,
    pub date: String,
    pub created_at: String,
    pub seq: i64,
    pub detail: String,
}

/// Derive the legs touching `account_id` from its raw records. Transfer legs
/// are views over the transfer row: the debit is the recorded amount, the
/// credit is amount * conversion_rate in the destination currency.
pub fn account_legs(
    account_id: i64,
    incomes: &[Income],
    expenses: &[Expense],
    transfers: &[AccountTransfer],
) -> Vec<Leg> {
    let mut legs = Vec::new();
    for t in incomes {
        if t.account_id == account_id {
            legs.push(Leg {
                kind: LegKind::Income,
                amount: t.amount,
                date: t.date.to_string(),
                created_at: t.created_at.clone(),
                seq: t.id,
                detail: t.kind.clone(),
            });
        }
    }
    for t in expenses {
        if t.account_id == account_id {
            legs.push(Leg {
                kind: LegKind::Expense,
                amount: -t.amount,
                date: t.date.to_string(),
                created_at: t.created_at.clone(),
                seq: t.id,
                detail: format!("{}/{}", t.main_type, t.sub_type),
            });
        }
    }
    for t in transfers {
        if t.from_account_id == account_id {
            legs.push(Leg {
                kind: LegKind::TransferOut,
                amount: -t.amount,
                date: t.created_at.chars().take(10).collect(),
                created_at: t.created_at.clone(),
                seq: t.id,
                detail: t.note.clone().unwrap_or_default(),
            });
        }
        if t.to_account_id == account_id {
            legs.push(Leg {
                kind: LegKind::TransferIn,
                amount: t.amount * t.conversion_rate,
                date: t.created_at.chars().take(10).collect(),
                created_at: t.created_at.clone(),
                seq: t.id,
                detail: t.note.clone().unwrap_or_default(),
            });
        }
    }
    legs
}

/// Fold the account's legs in entry order, emitting the balance after each
/// one. Ordering is ascending `created_at`, tie-broken by source row id so
/// same-second entries replay deterministically. Callers wanting
/// most-recent-first display reverse the result; the fold itself is always
/// oldest-first.
pub fn running_balance(account: &LedgerAccount, mut legs: Vec<Leg>) -> Vec<(Leg, Decimal)> {
    legs.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.seq.cmp(&b.seq))
    });
    let mut balance = account.initial_balance;
    legs.into_iter()
        .map(|leg| {
            balance += leg.amount;
            (leg, balance)
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct TransferLegs {
    pub debit: Leg,
    pub credit: Leg,
}

/// Validate a transfer and produce its two derived legs. The transfer row is
/// the durable record; these legs only exist as views for balance folding.
pub fn execute_transfer(
    from: &LedgerAccount,
    to: &LedgerAccount,
    amount: Decimal,
    conversion_rate: Decimal,
    note: Option<&str>,
) -> LedgerResult<TransferLegs> {
    if from.id == to.id {
        return Err(LedgerError::SameAccountTransfer);
    }
    if amount <= Decimal::ZERO {
        return Err(LedgerError::InvalidAmount(amount));
    }
    if conversion_rate <= Decimal::ZERO {
        return Err(LedgerError::InvalidRate(conversion_rate));
    }
    // Same currency on both sides must carry rate 1. Rejected, not coerced,
    // so the caller sees the bad rate instead of a silent correction.
    if from.currency == to.currency && conversion_rate != Decimal::ONE {
        return Err(LedgerError::RateMismatch {
            from: from.currency.clone(),
            to: to.currency.clone(),
            rate: conversion_rate,
        });
    }
    let detail = note.unwrap_or_default().to_string();
    Ok(TransferLegs {
        debit: Leg {
            kind: LegKind::TransferOut,
            amount: -amount,
            date: String::new(),
            created_at: String::new(),
            seq: 0,
            detail: detail.clone(),
        },
        credit: Leg {
            kind: LegKind::TransferIn,
            amount: amount * conversion_rate,
            date: String::new(),
            created_at: String::new(),
            seq: 0,
            detail,
        },
    })
}
