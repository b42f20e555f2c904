// Copyright (c) Lodgekeep Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::currency::CurrencyTable;
use crate::errors::{LedgerError, LedgerResult};
use crate::models::{LedgerAccount, Reservation, ReservationStatus};
use rust_decimal::Decimal;

/// Tolerance for the total == paid + balance invariant, one minor unit.
pub fn invariant_epsilon() -> Decimal {
    Decimal::new(1, 2)
}

pub fn reservation_number(year: i32, seq: i64) -> String {
    format!("RES{}{:04}", year, seq)
}

pub fn payment_number(year: i32, seq: i64) -> String {
    format!("PAY{}{:04}", year, seq)
}

/// Commission owed to a guide or agent: a percentage of reservation value,
/// rounded to minor-unit precision. Always recomputed from the current total,
/// never accumulated onto a previous figure.
pub fn commission(total: Decimal, rate: Decimal) -> Decimal {
    (total * rate / Decimal::ONE_HUNDRED).round_dp(2)
}

#[derive(Debug, Clone, Default)]
pub struct ReservationInput {
    pub room_rate: Decimal,
    pub nights: u32,
    /// Explicit total; when absent the total is room_rate * nights.
    pub total_override: Option<Decimal>,
    pub currency: String,
    pub guide_id: Option<i64>,
    pub guide_rate: Decimal,
    pub agent_id: Option<i64>,
    pub agent_rate: Decimal,
}

pub fn new_reservation(number: String, input: ReservationInput) -> Reservation {
    let total = input
        .total_override
        .unwrap_or(input.room_rate * Decimal::from(input.nights));
    Reservation {
        id: 0,
        reservation_number: number,
        room_rate: input.room_rate,
        nights: input.nights,
        total_amount: total,
        paid_amount: Decimal::ZERO,
        balance_amount: total,
        currency: input.currency,
        status: ReservationStatus::Tentative,
        guide_id: input.guide_id,
        guide_rate: input.guide_rate,
        guide_commission: commission(total, input.guide_rate),
        agent_id: input.agent_id,
        agent_rate: input.agent_rate,
        agent_commission: commission(total, input.agent_rate),
    }
}

/// Re-derive the dependent fields after the total changes: the outstanding
/// balance and both commissions.
pub fn retotal(reservation: &mut Reservation, new_total: Decimal) {
    reservation.total_amount = new_total;
    reservation.balance_amount = new_total - reservation.paid_amount;
    reservation.guide_commission = commission(new_total, reservation.guide_rate);
    reservation.agent_commission = commission(new_total, reservation.agent_rate);
}

#[derive(Debug, Clone)]
pub struct SettlementOutcome {
    /// Payment amount in the reservation's currency, as applied to the triple.
    pub applied_amount: Decimal,
    pub paid_amount: Decimal,
    pub balance_amount: Decimal,
    pub status: ReservationStatus,
    /// Set when currency conversion failed and the unconverted amount was
    /// applied instead. The payment still goes through.
    pub warning: Option<String>,
}

/// Apply a payment to a reservation, keeping total == paid + balance.
///
/// Conversion into the reservation currency is best-effort: a conversion
/// failure degrades to the unconverted amount plus a warning, because
/// recording the payment takes priority over currency accuracy. Validation
/// failures (non-positive amount, payment currency not matching the receiving
/// account) block the write outright.
pub fn apply_payment(
    reservation: &Reservation,
    amount: Decimal,
    payment_currency: &str,
    account: &LedgerAccount,
    table: &CurrencyTable,
) -> LedgerResult<SettlementOutcome> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::InvalidAmount(amount));
    }
    let payment_currency = payment_currency.trim().to_uppercase();
    if account.currency != payment_currency {
        return Err(LedgerError::AccountCurrencyMismatch {
            account: account.currency.clone(),
            payment: payment_currency,
        });
    }

    let (applied, warning) = if payment_currency == reservation.currency {
        (amount, None)
    } else {
        match table.convert(amount, &payment_currency, &reservation.currency) {
            Ok(converted) => (converted.round_dp(2), None),
            Err(e) => (
                amount,
                Some(format!(
                    "could not convert {} {} to {}: {}; applied unconverted",
                    amount, payment_currency, reservation.currency, e
                )),
            ),
        }
    };

    let paid = reservation.paid_amount + applied;
    let balance = reservation.total_amount - paid;
    // A payment may settle the reservation but never walks the status back.
    let status = if balance <= Decimal::ZERO && reservation.status == ReservationStatus::Tentative {
        ReservationStatus::Confirmed
    } else {
        reservation.status
    };

    Ok(SettlementOutcome {
        applied_amount: applied,
        paid_amount: paid,
        balance_amount: balance,
        status,
        warning,
    })
}
