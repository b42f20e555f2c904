// Copyright (c) Lodgekeep Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use lodgekeep::currency::CurrencyTable;
use lodgekeep::errors::LedgerError;
use lodgekeep::models::{CurrencyRate, LedgerAccount, Reservation, ReservationStatus};
use lodgekeep::settlement::{self, ReservationInput};
use rust_decimal::Decimal;

fn table() -> CurrencyTable {
    let mut t = CurrencyTable::new(vec![CurrencyRate {
        currency_code: "USD".into(),
        usd_rate: Decimal::ONE,
        is_custom: false,
        updated_at: String::new(),
    }]);
    t.add_custom("LKR", Decimal::new(300, 0)).unwrap();
    t
}

fn lkr_account() -> LedgerAccount {
    LedgerAccount {
        id: 1,
        name: "Till".into(),
        currency: "LKR".into(),
        initial_balance: Decimal::ZERO,
        location_access: Vec::new(),
    }
}

fn reservation(total: i64, currency: &str) -> Reservation {
    settlement::new_reservation(
        "RES20260001".into(),
        ReservationInput {
            room_rate: Decimal::from(total),
            nights: 1,
            total_override: None,
            currency: currency.into(),
            ..Default::default()
        },
    )
}

#[test]
fn new_reservation_derives_total_and_balance() {
    let res = settlement::new_reservation(
        "RES20260007".into(),
        ReservationInput {
            room_rate: Decimal::from(7500),
            nights: 3,
            total_override: None,
            currency: "LKR".into(),
            guide_id: Some(4),
            guide_rate: Decimal::from(10),
            ..Default::default()
        },
    );
    assert_eq!(res.total_amount, Decimal::from(22500));
    assert_eq!(res.paid_amount, Decimal::ZERO);
    assert_eq!(res.balance_amount, Decimal::from(22500));
    assert_eq!(res.status, ReservationStatus::Tentative);
    assert_eq!(res.guide_commission, Decimal::from(2250));
}

#[test]
fn explicit_total_overrides_room_rate_times_nights() {
    let res = settlement::new_reservation(
        "RES20260008".into(),
        ReservationInput {
            room_rate: Decimal::from(7500),
            nights: 3,
            total_override: Some(Decimal::from(20000)),
            currency: "LKR".into(),
            ..Default::default()
        },
    );
    assert_eq!(res.total_amount, Decimal::from(20000));
    assert_eq!(res.balance_amount, Decimal::from(20000));
}

#[test]
fn payments_keep_the_triple_consistent_and_confirm_when_settled() {
    let t = table();
    let account = lkr_account();
    let mut res = reservation(15000, "LKR");

    let first =
        settlement::apply_payment(&res, Decimal::from(5000), "LKR", &account, &t).unwrap();
    assert_eq!(first.paid_amount, Decimal::from(5000));
    assert_eq!(first.balance_amount, Decimal::from(10000));
    assert_eq!(first.status, ReservationStatus::Tentative);
    res.paid_amount = first.paid_amount;
    res.balance_amount = first.balance_amount;
    res.status = first.status;

    let second =
        settlement::apply_payment(&res, Decimal::from(10000), "LKR", &account, &t).unwrap();
    assert_eq!(second.paid_amount, Decimal::from(15000));
    assert_eq!(second.balance_amount, Decimal::ZERO);
    assert_eq!(second.status, ReservationStatus::Confirmed);
    assert_eq!(
        res.total_amount,
        second.paid_amount + second.balance_amount
    );
}

#[test]
fn status_is_never_walked_back_by_a_payment() {
    let t = table();
    let account = lkr_account();
    let mut res = reservation(1000, "LKR");
    res.status = ReservationStatus::CheckedIn;
    let outcome =
        settlement::apply_payment(&res, Decimal::from(1000), "LKR", &account, &t).unwrap();
    assert_eq!(outcome.status, ReservationStatus::CheckedIn);
}

#[test]
fn payment_validation_errors_block_the_write() {
    let t = table();
    let account = lkr_account();
    let res = reservation(1000, "LKR");
    assert!(matches!(
        settlement::apply_payment(&res, Decimal::ZERO, "LKR", &account, &t).unwrap_err(),
        LedgerError::InvalidAmount(_)
    ));
    assert!(matches!(
        settlement::apply_payment(&res, Decimal::from(10), "USD", &account, &t).unwrap_err(),
        LedgerError::AccountCurrencyMismatch { .. }
    ));
}

#[test]
fn cross_currency_payment_is_converted_into_reservation_currency() {
    let t = table();
    let account = lkr_account();
    let res = reservation(100, "USD");
    // 3000 LKR at 300/USD -> 10 USD
    let outcome =
        settlement::apply_payment(&res, Decimal::from(3000), "LKR", &account, &t).unwrap();
    assert_eq!(outcome.applied_amount, Decimal::from(10));
    assert_eq!(outcome.balance_amount, Decimal::from(90));
    assert!(outcome.warning.is_none());
}

#[test]
fn conversion_failure_degrades_to_unconverted_amount_with_warning() {
    let t = table();
    let account = lkr_account();
    // Reservation denominated in a currency the table does not know.
    let res = reservation(5000, "THB");
    let outcome =
        settlement::apply_payment(&res, Decimal::from(2000), "LKR", &account, &t).unwrap();
    assert_eq!(outcome.applied_amount, Decimal::from(2000));
    assert_eq!(outcome.paid_amount, Decimal::from(2000));
    assert_eq!(outcome.balance_amount, Decimal::from(3000));
    assert!(outcome.warning.is_some());
}

#[test]
fn commissions_recompute_from_the_new_total() {
    let mut res = settlement::new_reservation(
        "RES20260009".into(),
        ReservationInput {
            room_rate: Decimal::from(1000),
            nights: 1,
            total_override: None,
            currency: "LKR".into(),
            guide_id: Some(2),
            guide_rate: Decimal::from(10),
            ..Default::default()
        },
    );
    assert_eq!(res.guide_commission, Decimal::from(100));
    settlement::retotal(&mut res, Decimal::from(2000));
    // Recomputed, not accumulated.
    assert_eq!(res.guide_commission, Decimal::from(200));
    assert_eq!(res.balance_amount, Decimal::from(2000));
}

#[test]
fn commission_rounds_to_minor_units() {
    // 333.33 * 7.5% = 24.99975 -> 25.00
    let c = settlement::commission(Decimal::new(33333, 2), Decimal::new(75, 1));
    assert_eq!(c, Decimal::new(2500, 2));
}
