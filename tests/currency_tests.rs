// Copyright (c) Lodgekeep Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use lodgekeep::currency::CurrencyTable;
use lodgekeep::errors::LedgerError;
use lodgekeep::models::CurrencyRate;
use rust_decimal::Decimal;

fn usd_row() -> CurrencyRate {
    CurrencyRate {
        currency_code: "USD".into(),
        usd_rate: Decimal::ONE,
        is_custom: false,
        updated_at: "2026-01-01 00:00:00".into(),
    }
}

fn table() -> CurrencyTable {
    let mut t = CurrencyTable::new(vec![usd_row()]);
    t.add_custom("LKR", Decimal::new(300, 0)).unwrap();
    t.add_custom("EUR", Decimal::new(90, 2)).unwrap(); // 0.90 per USD
    t
}

#[test]
fn same_currency_is_identity_without_rounding() {
    let t = table();
    let odd = Decimal::new(1234567, 5); // 12.34567
    assert_eq!(t.convert(odd, "LKR", "LKR").unwrap(), odd);
    assert_eq!(t.convert(odd, "usd", "USD").unwrap(), odd);
}

#[test]
fn pivots_through_usd() {
    let t = table();
    // 90 EUR -> 100 USD -> 30000 LKR
    let res = t
        .convert(Decimal::new(90, 0), "EUR", "LKR")
        .unwrap()
        .round_dp(2);
    assert_eq!(res, Decimal::new(3000000, 2));
    // and back within rounding tolerance
    let back = t.convert(res, "LKR", "EUR").unwrap().round_dp(2);
    assert_eq!(back, Decimal::new(9000, 2));
}

#[test]
fn unknown_currency_rejected() {
    let t = table();
    assert_eq!(
        t.rate("GBP").unwrap_err(),
        LedgerError::UnknownCurrency("GBP".into())
    );
    assert!(matches!(
        t.convert(Decimal::ONE, "GBP", "USD").unwrap_err(),
        LedgerError::UnknownCurrency(_)
    ));
    assert!(matches!(
        t.convert(Decimal::ONE, "USD", "GBP").unwrap_err(),
        LedgerError::UnknownCurrency(_)
    ));
}

#[test]
fn zero_source_rate_cannot_be_divided_through() {
    // A zero rate can only arrive via a hand-edited store; conversion must
    // refuse to divide by it.
    let t = CurrencyTable::new(vec![
        usd_row(),
        CurrencyRate {
            currency_code: "XXX".into(),
            usd_rate: Decimal::ZERO,
            is_custom: true,
            updated_at: String::new(),
        },
    ]);
    assert!(matches!(
        t.convert(Decimal::from(10), "XXX", "USD").unwrap_err(),
        LedgerError::InvalidRate(_)
    ));
}

#[test]
fn usd_row_is_immutable() {
    let mut t = table();
    assert_eq!(
        t.update_rate("USD", Decimal::TWO).unwrap_err(),
        LedgerError::ProtectedCurrency("USD".into())
    );
    assert_eq!(
        t.remove_custom("usd").unwrap_err(),
        LedgerError::ProtectedCurrency("USD".into())
    );
}

#[test]
fn duplicate_detection_is_case_insensitive() {
    let mut t = table();
    assert_eq!(
        t.add_custom("lkr", Decimal::new(310, 0)).unwrap_err(),
        LedgerError::DuplicateCurrency("LKR".into())
    );
}

#[test]
fn non_positive_rates_rejected() {
    let mut t = table();
    assert!(matches!(
        t.add_custom("GBP", Decimal::ZERO).unwrap_err(),
        LedgerError::InvalidRate(_)
    ));
    assert!(matches!(
        t.update_rate("LKR", Decimal::new(-1, 0)).unwrap_err(),
        LedgerError::InvalidRate(_)
    ));
}

#[test]
fn update_changes_rate_and_keeps_stamp() {
    let mut t = table();
    let after = t.update_rate("LKR", Decimal::new(320, 0)).unwrap();
    assert_eq!(after.usd_rate, Decimal::new(320, 0));
    assert!(!after.updated_at.is_empty());
}

#[test]
fn removing_missing_or_base_currency_fails() {
    let mut t = table();
    assert!(matches!(
        t.remove_custom("GBP").unwrap_err(),
        LedgerError::NotFound(_)
    ));
    t.remove_custom("EUR").unwrap();
    assert!(!t.contains("EUR"));
}
