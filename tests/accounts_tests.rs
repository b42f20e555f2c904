// Copyright (c) Lodgekeep Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use lodgekeep::errors::LedgerError;
use lodgekeep::{cli, commands, db};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

#[test]
fn account_currency_must_be_registered() {
    let conn = setup();
    let err = commands::accounts::add(&conn, "Till", "LKR", Decimal::ZERO, &[]).unwrap_err();
    assert_eq!(
        err.downcast_ref::<LedgerError>(),
        Some(&LedgerError::UnknownCurrency("LKR".into()))
    );
    commands::currencies::add_custom(&conn, "LKR", Decimal::new(300, 0)).unwrap();
    commands::accounts::add(&conn, "Till", "LKR", Decimal::from(500), &[1, 2]).unwrap();

    let rows = commands::accounts::query_rows(&conn).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].balance, "500.00");
    assert_eq!(rows[0].locations, "[1,2]");
}

#[test]
fn account_removal_refused_while_referenced() {
    let conn = setup();
    commands::currencies::add_custom(&conn, "LKR", Decimal::new(300, 0)).unwrap();
    commands::accounts::add(&conn, "Till", "LKR", Decimal::ZERO, &[]).unwrap();
    commands::income::record(
        &conn,
        "Till",
        Decimal::from(100),
        NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
        "room",
        "cash",
        0,
        None,
        None,
    )
    .unwrap();

    assert!(commands::accounts::remove(&conn, "Till").is_err());
    conn.execute("DELETE FROM income", []).unwrap();
    commands::accounts::remove(&conn, "Till").unwrap();
    assert!(commands::accounts::query_rows(&conn).unwrap().is_empty());
}

#[test]
fn currency_mutations_write_through_to_the_store() {
    let conn = setup();
    commands::currencies::add_custom(&conn, "lkr", Decimal::new(300, 0)).unwrap();
    let stored: String = conn
        .query_row(
            "SELECT usd_rate FROM currency_rates WHERE currency_code='LKR'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(stored, "300");

    commands::currencies::update_rate(&conn, "LKR", Decimal::new(320, 0)).unwrap();
    let stored: String = conn
        .query_row(
            "SELECT usd_rate FROM currency_rates WHERE currency_code='LKR'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(stored, "320");

    commands::currencies::remove_custom(&conn, "LKR").unwrap();
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM currency_rates WHERE currency_code='LKR'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(count, 0);

    // The protected USD row survives all of it.
    assert!(commands::currencies::remove_custom(&conn, "USD").is_err());
    assert!(commands::currencies::update_rate(&conn, "USD", Decimal::TWO).is_err());
}

#[test]
fn pending_income_filter_through_the_cli() {
    let conn = setup();
    commands::currencies::add_custom(&conn, "LKR", Decimal::new(300, 0)).unwrap();
    commands::accounts::add(&conn, "Till", "LKR", Decimal::ZERO, &[]).unwrap();
    let date = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();
    commands::income::record(&conn, "Till", Decimal::from(100), date, "room", "cash", 0, None, None)
        .unwrap();
    commands::income::record(
        &conn,
        "Till",
        Decimal::from(250),
        date,
        "room",
        "pending",
        0,
        None,
        None,
    )
    .unwrap();

    let matches = cli::build_cli().get_matches_from([
        "lodgekeep", "income", "list", "--pending",
    ]);
    if let Some(("income", income_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = income_m.subcommand() {
            let rows = commands::income::query_rows(&conn, list_m).unwrap();
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].amount, "250");
            assert_eq!(rows[0].method, "pending");
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no income subcommand");
    }
}

#[test]
fn doctor_flags_triple_drift_and_unregistered_currency() {
    let conn = setup();
    commands::currencies::add_custom(&conn, "LKR", Decimal::new(300, 0)).unwrap();
    commands::accounts::add(&conn, "Till", "LKR", Decimal::ZERO, &[]).unwrap();
    assert!(commands::doctor::run_checks(&conn).unwrap().is_empty());

    // Corrupt a reservation triple behind the engine's back.
    conn.execute(
        "INSERT INTO reservations(reservation_number, room_rate, nights, total_amount, paid_amount, balance_amount, currency, status)
         VALUES ('RES20260099', '1000', 1, '1000', '400', '500', 'LKR', 'tentative')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO accounts(name, currency, initial_balance) VALUES ('Ghost', 'XXX', '0')",
        [],
    )
    .unwrap();

    let issues = commands::doctor::run_checks(&conn).unwrap();
    assert!(issues.iter().any(|r| r[0] == "reservation_triple_drift"));
    assert!(issues.iter().any(|r| r[0] == "account_currency_unregistered"));
}

#[test]
fn schema_survives_reopen_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lodgekeep.sqlite");
    {
        let mut conn = Connection::open(&path).unwrap();
        db::init_schema(&mut conn).unwrap();
        commands::currencies::add_custom(&conn, "LKR", Decimal::new(300, 0)).unwrap();
    }
    let mut conn = Connection::open(&path).unwrap();
    db::init_schema(&mut conn).unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM currency_rates", [], |r| r.get(0))
        .unwrap();
    // USD seed plus the custom row, not duplicated by re-init.
    assert_eq!(count, 2);
}
