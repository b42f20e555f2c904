// Copyright (c) Lodgekeep Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::currency::CurrencyTable;
use crate::settlement::{self, SettlementOutcome};
use crate::utils::{
    account_by_name, maybe_print_json, parse_date, parse_decimal, pretty_table,
    reservation_by_number,
};
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let reservation = sub.get_one::<String>("reservation").unwrap();
            let account = sub.get_one::<String>("account").unwrap();
            let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
            let currency = sub.get_one::<String>("currency").map(|s| s.as_str());
            let method = sub.get_one::<String>("method").unwrap();
            let date = match sub.get_one::<String>("date") {
                Some(d) => parse_date(d)?,
                None => chrono::Utc::now().date_naive(),
            };
            let recorded = record(conn, reservation, account, amount, currency, method, date)?;
            if let Some(w) = &recorded.outcome.warning {
                eprintln!("warning: {}", w);
            }
            println!(
                "Recorded {} against {}: paid {:.2}, balance {:.2}, status {}",
                recorded.payment_number,
                reservation,
                recorded.outcome.paid_amount,
                recorded.outcome.balance_amount,
                recorded.outcome.status
            );
        }
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Debug)]
pub struct RecordedPayment {
    pub payment_number: String,
    pub outcome: SettlementOutcome,
}

/// The settlement sequence: insert the Payment, mirror it as an Income leg on
/// the receiving account, and update the reservation triple. All three writes
/// commit or roll back together so a partial failure can never leave
/// total != paid + balance.
pub fn record(
    conn: &mut Connection,
    reservation_number: &str,
    account_name: &str,
    amount: Decimal,
    currency: Option<&str>,
    method: &str,
    date: NaiveDate,
) -> Result<RecordedPayment> {
    let reservation = reservation_by_number(conn, reservation_number)?;
    let account = account_by_name(conn, account_name)?;
    let tender = currency.unwrap_or(&account.currency);
    let table = CurrencyTable::load(conn)?;
    let outcome = settlement::apply_payment(&reservation, amount, tender, &account, &table)?;

    let year = date.format("%Y").to_string().parse::<i32>()?;
    let tx = conn.transaction()?;
    let seq = crate::db::next_number(&tx, "PAY", year)?;
    let payment_number = settlement::payment_number(year, seq);
    tx.execute(
        "INSERT INTO payments(payment_number, reservation_id, account_id, amount, currency, payment_method)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            payment_number,
            reservation.id,
            account.id,
            amount.to_string(),
            account.currency,
            method
        ],
    )?;
    tx.execute(
        "INSERT INTO income(date, account_id, amount, currency, type, payment_method, location_id, note, booking_id)
         VALUES (?1, ?2, ?3, ?4, 'reservation_payment', ?5, 0, ?6, ?7)",
        params![
            date.to_string(),
            account.id,
            amount.to_string(),
            account.currency,
            method,
            format!("payment {} for {}", payment_number, reservation_number),
            reservation.id
        ],
    )?;
    tx.execute(
        "UPDATE reservations SET paid_amount=?2, balance_amount=?3, status=?4 WHERE id=?1",
        params![
            reservation.id,
            outcome.paid_amount.to_string(),
            outcome.balance_amount.to_string(),
            outcome.status.as_str()
        ],
    )?;
    tx.commit()?;

    Ok(RecordedPayment {
        payment_number,
        outcome,
    })
}

#[derive(Serialize)]
pub struct PaymentRow {
    pub number: String,
    pub reservation: String,
    pub account: String,
    pub amount: String,
    pub currency: String,
    pub method: String,
}

pub fn query_rows(conn: &Connection, reservation: Option<&str>) -> Result<Vec<PaymentRow>> {
    let mut sql = String::from(
        "SELECT p.payment_number, r.reservation_number, a.name, p.amount, p.currency, p.payment_method
         FROM payments p
         LEFT JOIN reservations r ON p.reservation_id=r.id
         LEFT JOIN accounts a ON p.account_id=a.id WHERE 1=1",
    );
    let mut params_vec: Vec<String> = Vec::new();
    if let Some(number) = reservation {
        sql.push_str(" AND r.reservation_number=?");
        params_vec.push(number.to_string());
    }
    sql.push_str(" ORDER BY p.id DESC");

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = if params_vec.is_empty() {
        stmt.query([])?
    } else {
        let params: Vec<&dyn rusqlite::ToSql> = params_vec
            .iter()
            .map(|s| s as &dyn rusqlite::ToSql)
            .collect();
        stmt.query(rusqlite::params_from_iter(params))?
    };

    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let number: String = r.get(0)?;
        let reservation: Option<String> = r.get(1)?;
        let account: Option<String> = r.get(2)?;
        let amount: String = r.get(3)?;
        let currency: String = r.get(4)?;
        let method: String = r.get(5)?;
        data.push(PaymentRow {
            number,
            reservation: reservation.unwrap_or_default(),
            account: account.unwrap_or_default(),
            amount,
            currency,
            method,
        });
    }
    Ok(data)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let reservation = sub.get_one::<String>("reservation").map(|s| s.as_str());
    let data = query_rows(conn, reservation)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.number.clone(),
                    r.reservation.clone(),
                    r.account.clone(),
                    r.amount.clone(),
                    r.currency.clone(),
                    r.method.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Number", "Reservation", "Account", "Amount", "CCY", "Method"],
                rows,
            )
        );
    }
    Ok(())
}
