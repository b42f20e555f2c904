// Copyright (c) Lodgekeep Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger;
use crate::utils::{account_by_name, maybe_print_json, parse_decimal, pretty_table};
use anyhow::Result;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let from = sub.get_one::<String>("from").unwrap();
            let to = sub.get_one::<String>("to").unwrap();
            let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
            let rate = parse_decimal(sub.get_one::<String>("rate").unwrap())?;
            let note = sub.get_one::<String>("note").map(|s| s.to_string());
            let credited = execute(conn, from, to, amount, rate, note.as_deref())?;
            println!(
                "Transferred {} from '{}' to '{}' (credited {})",
                amount, from, to, credited
            );
        }
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// Validate through the ledger and persist the transfer row. The row itself
/// is the durable record; debit/credit legs are derived at read time.
pub fn execute(
    conn: &Connection,
    from_name: &str,
    to_name: &str,
    amount: Decimal,
    conversion_rate: Decimal,
    note: Option<&str>,
) -> Result<Decimal> {
    let from = account_by_name(conn, from_name)?;
    let to = account_by_name(conn, to_name)?;
    let legs = ledger::execute_transfer(&from, &to, amount, conversion_rate, note)?;
    conn.execute(
        "INSERT INTO account_transfers(from_account_id, to_account_id, amount, conversion_rate, note)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            from.id,
            to.id,
            amount.to_string(),
            conversion_rate.to_string(),
            note
        ],
    )?;
    Ok(legs.credit.amount)
}

#[derive(Serialize)]
pub struct TransferRow {
    pub created_at: String,
    pub from: String,
    pub to: String,
    pub amount: String,
    pub rate: String,
    pub credited: String,
    pub note: String,
}

pub fn query_rows(conn: &Connection) -> Result<Vec<TransferRow>> {
    let mut stmt = conn.prepare(
        "SELECT t.created_at, f.name, g.name, t.amount, t.conversion_rate, t.note
         FROM account_transfers t
         LEFT JOIN accounts f ON t.from_account_id=f.id
         LEFT JOIN accounts g ON t.to_account_id=g.id
         ORDER BY t.id DESC",
    )?;
    let mut rows = stmt.query([])?;
    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let created_at: String = r.get(0)?;
        let from: Option<String> = r.get(1)?;
        let to: Option<String> = r.get(2)?;
        let amount: String = r.get(3)?;
        let rate: String = r.get(4)?;
        let note: Option<String> = r.get(5)?;
        let credited = parse_decimal(&amount)? * parse_decimal(&rate)?;
        data.push(TransferRow {
            created_at,
            from: from.unwrap_or_default(),
            to: to.unwrap_or_default(),
            amount,
            rate,
            credited: credited.to_string(),
            note: note.unwrap_or_default(),
        });
    }
    Ok(data)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.created_at.clone(),
                    r.from.clone(),
                    r.to.clone(),
                    r.amount.clone(),
                    r.rate.clone(),
                    r.credited.clone(),
                    r.note.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Created", "From", "To", "Amount", "Rate", "Credited", "Note"],
                rows,
            )
        );
    }
    Ok(())
}
