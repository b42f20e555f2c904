// Copyright (c) Lodgekeep Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::currency::CurrencyTable;
use crate::errors::LedgerError;
use crate::ledger;
use crate::utils::{all_accounts, maybe_print_json, parse_decimal, pretty_table};
use anyhow::{Result, bail};
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let ccy = sub.get_one::<String>("currency").unwrap().to_uppercase();
            let initial = parse_decimal(sub.get_one::<String>("initial-balance").unwrap())?;
            let locations = parse_locations(sub.get_one::<String>("locations"))?;
            add(conn, name, &ccy, initial, &locations)?;
            println!("Added account '{}' ({}, opening {})", name, ccy, initial);
        }
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            remove(conn, name)?;
            println!("Removed account '{}'", name);
        }
        _ => {}
    }
    Ok(())
}

fn parse_locations(arg: Option<&String>) -> Result<Vec<i64>> {
    let Some(s) = arg else {
        return Ok(Vec::new());
    };
    s.split(',')
        .filter(|p| !p.trim().is_empty())
        .map(|p| {
            p.trim()
                .parse::<i64>()
                .map_err(|_| anyhow::anyhow!("Invalid location id '{}'", p))
        })
        .collect()
}

pub fn add(
    conn: &Connection,
    name: &str,
    currency: &str,
    initial_balance: Decimal,
    location_access: &[i64],
) -> Result<i64> {
    // Accounts may only be denominated in a registered currency.
    let table = CurrencyTable::load(conn)?;
    if !table.contains(currency) {
        return Err(LedgerError::UnknownCurrency(currency.to_string()).into());
    }
    conn.execute(
        "INSERT INTO accounts(name, currency, initial_balance, location_access) VALUES (?1, ?2, ?3, ?4)",
        params![
            name,
            currency,
            initial_balance.to_string(),
            serde_json::to_string(location_access)?
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Deleting an account that still has ledger entries would orphan them and
/// silently change every derived balance, so it is refused.
pub fn remove(conn: &Connection, name: &str) -> Result<()> {
    let account = crate::utils::account_by_name(conn, name)?;
    let referenced: i64 = conn.query_row(
        "SELECT (SELECT COUNT(*) FROM income WHERE account_id=?1)
              + (SELECT COUNT(*) FROM expenses WHERE account_id=?1)
              + (SELECT COUNT(*) FROM account_transfers WHERE from_account_id=?1 OR to_account_id=?1)
              + (SELECT COUNT(*) FROM payments WHERE account_id=?1)",
        params![account.id],
        |r| r.get(0),
    )?;
    if referenced > 0 {
        bail!(
            "Account '{}' still has {} ledger record(s); remove them first",
            name,
            referenced
        );
    }
    conn.execute("DELETE FROM accounts WHERE id=?1", params![account.id])?;
    Ok(())
}

#[derive(Serialize)]
pub struct AccountRow {
    pub name: String,
    pub currency: String,
    pub initial_balance: String,
    pub balance: String,
    pub locations: String,
}

pub fn query_rows(conn: &Connection) -> Result<Vec<AccountRow>> {
    let mut out = Vec::new();
    for account in all_accounts(conn)? {
        let incomes = crate::utils::incomes_for_account(conn, account.id)?;
        let expenses = crate::utils::expenses_for_account(conn, account.id)?;
        let transfers = crate::utils::transfers_touching_account(conn, account.id)?;
        let (transfers_in, transfers_out): (Vec<_>, Vec<_>) = transfers
            .into_iter()
            .partition(|t| t.to_account_id == account.id);
        let balance =
            ledger::current_balance(&account, &incomes, &expenses, &transfers_in, &transfers_out);
        out.push(AccountRow {
            name: account.name.clone(),
            currency: account.currency.clone(),
            initial_balance: format!("{:.2}", account.initial_balance),
            balance: format!("{:.2}", balance),
            locations: if account.location_access.is_empty() {
                "all".to_string()
            } else {
                serde_json::to_string(&account.location_access)?
            },
        });
    }
    Ok(out)
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
                    r.name.clone(),
                    r.currency.clone(),
                    r.initial_balance.clone(),
                    r.balance.clone(),
                    r.locations.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Account", "CCY", "Opening", "Balance", "Locations"], rows)
        );
    }
    Ok(())
}
