// Copyright (c) Lodgekeep Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::errors::LedgerError;
use crate::models::PENDING_METHOD;
use crate::utils::{account_by_name, maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add_cmd(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add_cmd(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let account_name = sub.get_one::<String>("account").unwrap();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let kind = sub.get_one::<String>("type").unwrap();
    let method = sub.get_one::<String>("method").unwrap();
    let location = *sub.get_one::<i64>("location").unwrap();
    let note = sub.get_one::<String>("note").map(|s| s.to_string());
    let booking = sub.get_one::<String>("booking");

    let booking_id = match booking {
        Some(number) => Some(crate::utils::reservation_by_number(conn, number)?.id),
        None => None,
    };
    record(
        conn, account_name, amount, date, kind, method, location, note.as_deref(), booking_id,
    )?;
    if method == PENDING_METHOD {
        println!(
            "Logged pending charge {} on {} (acct: {}) - not yet collected",
            amount, date, account_name
        );
    } else {
        println!("Recorded income {} on {} (acct: {})", amount, date, account_name);
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn record(
    conn: &Connection,
    account_name: &str,
    amount: Decimal,
    date: NaiveDate,
    kind: &str,
    method: &str,
    location_id: i64,
    note: Option<&str>,
    booking_id: Option<i64>,
) -> Result<i64> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::InvalidAmount(amount).into());
    }
    let account = account_by_name(conn, account_name)?;
    // The row caches the account currency as of recording time.
    conn.execute(
        "INSERT INTO income(date, account_id, amount, currency, type, payment_method, location_id, note, booking_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            date.to_string(),
            account.id,
            amount.to_string(),
            account.currency,
            kind,
            method,
            location_id,
            note,
            booking_id
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

#[derive(Serialize)]
pub struct IncomeRow {
    pub date: String,
    pub account: String,
    pub amount: String,
    pub currency: String,
    pub kind: String,
    pub method: String,
    pub note: String,
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<IncomeRow>> {
    let mut sql = String::from(
        "SELECT i.date, a.name, i.amount, i.currency, i.type, i.payment_method, i.note
         FROM income i LEFT JOIN accounts a ON i.account_id=a.id WHERE 1=1",
    );
    let mut params_vec: Vec<String> = Vec::new();

    if let Some(month) = sub.get_one::<String>("month") {
        sql.push_str(" AND substr(i.date,1,7)=?");
        params_vec.push(month.into());
    }
    if let Some(acct) = sub.get_one::<String>("account") {
        sql.push_str(" AND a.name=?");
        params_vec.push(acct.into());
    }
    if sub.get_flag("pending") {
        sql.push_str(" AND i.payment_method=?");
        params_vec.push(PENDING_METHOD.into());
    }
    sql.push_str(" ORDER BY i.date DESC, i.id DESC");
    if let Some(limit) = sub.get_one::<usize>("limit") {
        sql.push_str(" LIMIT ?");
        params_vec.push(limit.to_string());
    }

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
        let date: String = r.get(0)?;
        let account: Option<String> = r.get(1)?;
        let amount: String = r.get(2)?;
        let currency: String = r.get(3)?;
        let kind: String = r.get(4)?;
        let method: String = r.get(5)?;
        let note: Option<String> = r.get(6)?;
        data.push(IncomeRow {
            date,
            account: account.unwrap_or_default(),
            amount,
            currency,
            kind,
            method,
            note: note.unwrap_or_default(),
        });
    }
    Ok(data)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.account.clone(),
                    r.amount.clone(),
                    r.currency.clone(),
                    r.kind.clone(),
                    r.method.clone(),
                    r.note.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Date", "Account", "Amount", "CCY", "Type", "Method", "Note"],
                rows,
            )
        );
    }
    Ok(())
}
