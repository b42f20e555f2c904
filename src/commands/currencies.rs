// Copyright (c) Lodgekeep Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::currency::CurrencyTable;
use crate::utils::{maybe_print_json, parse_decimal, pretty_table};
use anyhow::Result;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let code = sub.get_one::<String>("code").unwrap();
            let rate = parse_decimal(sub.get_one::<String>("rate").unwrap())?;
            let added = add_custom(conn, code, rate)?;
            println!("Added currency {} at {} per USD", added, rate);
        }
        Some(("update", sub)) => {
            let code = sub.get_one::<String>("code").unwrap();
            let rate = parse_decimal(sub.get_one::<String>("rate").unwrap())?;
            let updated = update_rate(conn, code, rate)?;
            println!("Updated {} to {} per USD", updated, rate);
        }
        Some(("rm", sub)) => {
            let code = sub.get_one::<String>("code").unwrap();
            let removed = remove_custom(conn, code)?;
            println!("Removed currency {}", removed);
        }
        Some(("list", sub)) => list(conn, sub)?,
        Some(("convert", sub)) => {
            let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
            let from = sub.get_one::<String>("from").unwrap();
            let to = sub.get_one::<String>("to").unwrap();
            let table = CurrencyTable::load(conn)?;
            let res = table.convert(amount, from, to)?;
            println!(
                "{} {} -> {:.4} {}",
                amount,
                from.to_uppercase(),
                res,
                to.to_uppercase()
            );
        }
        _ => {}
    }
    Ok(())
}

/// Validate through the in-memory table, then write the surviving row through.
pub fn add_custom(conn: &Connection, code: &str, usd_rate: Decimal) -> Result<String> {
    let mut table = CurrencyTable::load(conn)?;
    let row = table.add_custom(code, usd_rate)?.clone();
    conn.execute(
        "INSERT INTO currency_rates(currency_code, usd_rate, is_custom, updated_at) VALUES (?1, ?2, 1, ?3)",
        params![row.currency_code, row.usd_rate.to_string(), row.updated_at],
    )?;
    Ok(row.currency_code)
}

pub fn update_rate(conn: &Connection, code: &str, usd_rate: Decimal) -> Result<String> {
    let mut table = CurrencyTable::load(conn)?;
    let row = table.update_rate(code, usd_rate)?.clone();
    conn.execute(
        "UPDATE currency_rates SET usd_rate=?2, updated_at=?3 WHERE currency_code=?1",
        params![row.currency_code, row.usd_rate.to_string(), row.updated_at],
    )?;
    Ok(row.currency_code)
}

pub fn remove_custom(conn: &Connection, code: &str) -> Result<String> {
    let mut table = CurrencyTable::load(conn)?;
    let row = table.remove_custom(code)?;
    conn.execute(
        "DELETE FROM currency_rates WHERE currency_code=?1",
        params![row.currency_code],
    )?;
    Ok(row.currency_code)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let table = CurrencyTable::load(conn)?;
    let data: Vec<_> = table.iter().cloned().collect();
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.currency_code.clone(),
                    r.usd_rate.to_string(),
                    if r.is_custom { "custom" } else { "base" }.to_string(),
                    r.updated_at.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Code", "Per USD", "Kind", "Updated"], rows)
        );
    }
    Ok(())
}
