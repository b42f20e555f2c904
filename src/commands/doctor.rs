// Copyright (c) Lodgekeep Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::currency::CurrencyTable;
use crate::settlement::invariant_epsilon;
use crate::utils::{parse_decimal, pretty_table};
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension};
use rust_decimal::Decimal;

pub fn handle(conn: &Connection) -> Result<()> {
    let rows = run_checks(conn)?;
    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

pub fn run_checks(conn: &Connection) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();
    let table = CurrencyTable::load(conn)?;

    // 1) Account currencies missing from the rate table
    let mut stmt = conn.prepare("SELECT name, currency FROM accounts")?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let name: String = r.get(0)?;
        let ccy: String = r.get(1)?;
        if !table.contains(&ccy) {
            rows.push(vec![
                "account_currency_unregistered".into(),
                format!("{} ({})", name, ccy),
            ]);
        }
    }

    // 2) Reservation triple drift beyond one minor unit
    let mut stmt2 = conn.prepare(
        "SELECT reservation_number, total_amount, paid_amount, balance_amount FROM reservations",
    )?;
    let mut cur2 = stmt2.query([])?;
    while let Some(r) = cur2.next()? {
        let number: String = r.get(0)?;
        let total = parse_decimal(&r.get::<_, String>(1)?)?;
        let paid = parse_decimal(&r.get::<_, String>(2)?)?;
        let balance = parse_decimal(&r.get::<_, String>(3)?)?;
        let drift = (total - paid - balance).abs();
        if drift > invariant_epsilon() {
            rows.push(vec![
                "reservation_triple_drift".into(),
                format!("{} off by {}", number, drift),
            ]);
        }
    }

    // 3) Same-currency transfers carrying a rate other than 1
    let mut stmt3 = conn.prepare(
        "SELECT t.id, t.conversion_rate FROM account_transfers t
         JOIN accounts f ON t.from_account_id=f.id
         JOIN accounts g ON t.to_account_id=g.id
         WHERE f.currency = g.currency",
    )?;
    let mut cur3 = stmt3.query([])?;
    while let Some(r) = cur3.next()? {
        let id: i64 = r.get(0)?;
        let rate = parse_decimal(&r.get::<_, String>(1)?)?;
        if rate != Decimal::ONE {
            rows.push(vec![
                "same_currency_rate".into(),
                format!("transfer {} has rate {}", id, rate),
            ]);
        }
    }

    // 4) Payments without a mirrored income row on the same booking
    let mut stmt4 = conn.prepare(
        "SELECT p.payment_number, p.reservation_id, p.account_id, p.amount FROM payments p",
    )?;
    let mut cur4 = stmt4.query([])?;
    while let Some(r) = cur4.next()? {
        let number: String = r.get(0)?;
        let reservation_id: i64 = r.get(1)?;
        let account_id: i64 = r.get(2)?;
        let amount: String = r.get(3)?;
        let mirrored: Option<i64> = conn
            .query_row(
                "SELECT id FROM income WHERE booking_id=?1 AND account_id=?2 AND amount=?3 LIMIT 1",
                rusqlite::params![reservation_id, account_id, amount],
                |r| r.get(0),
            )
            .optional()?;
        if mirrored.is_none() {
            rows.push(vec!["payment_unmirrored".into(), number]);
        }
    }

    Ok(rows)
}
