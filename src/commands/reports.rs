// Copyright (c) Lodgekeep Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::currency::CurrencyTable;
use crate::ledger;
use crate::utils::{
    account_by_name, all_accounts, expenses_for_account, incomes_for_account, maybe_print_json,
    pretty_table, transfers_touching_account,
};
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("balances", sub)) => balances(conn, sub)?,
        Some(("statement", sub)) => statement(conn, sub)?,
        Some(("reservations", sub)) => reservations(conn, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Serialize)]
pub struct BalanceRow {
    pub account: String,
    pub currency: String,
    pub balance: String,
}

/// Derived balance per account, folded from the full ledger on each call.
pub fn balance_rows(conn: &Connection, target_ccy: Option<&str>) -> Result<Vec<BalanceRow>> {
    let table = CurrencyTable::load(conn)?;
    let mut out = Vec::new();
    for account in all_accounts(conn)? {
        let incomes = incomes_for_account(conn, account.id)?;
        let expenses = expenses_for_account(conn, account.id)?;
        let transfers = transfers_touching_account(conn, account.id)?;
        let (transfers_in, transfers_out): (Vec<_>, Vec<_>) = transfers
            .into_iter()
            .partition(|t| t.to_account_id == account.id);
        let balance =
            ledger::current_balance(&account, &incomes, &expenses, &transfers_in, &transfers_out);
        match target_ccy {
            Some(target) => {
                let converted = table.convert(balance, &account.currency, target)?;
                out.push(BalanceRow {
                    account: account.name,
                    currency: target.to_uppercase(),
                    balance: format!("{:.2}", converted),
                });
            }
            None => out.push(BalanceRow {
                account: account.name,
                currency: account.currency,
                balance: format!("{:.2}", balance),
            }),
        }
    }
    Ok(out)
}

fn balances(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let target = sub.get_one::<String>("currency").map(|s| s.to_uppercase());
    let data = balance_rows(conn, target.as_deref())?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| vec![r.account.clone(), r.currency.clone(), r.balance.clone()])
            .collect();
        println!("{}", pretty_table(&["Account", "CCY", "Balance"], rows));
    }
    Ok(())
}

#[derive(Serialize)]
pub struct StatementRow {
    pub date: String,
    pub kind: String,
    pub detail: String,
    pub amount: String,
    pub balance: String,
}

/// Time-ordered running balance for one account. The fold is oldest-first;
/// rows come back most-recent-first for display.
pub fn statement_rows(conn: &Connection, account_name: &str) -> Result<Vec<StatementRow>> {
    let account = account_by_name(conn, account_name)?;
    let incomes = incomes_for_account(conn, account.id)?;
    let expenses = expenses_for_account(conn, account.id)?;
    let transfers = transfers_touching_account(conn, account.id)?;
    let legs = ledger::account_legs(account.id, &incomes, &expenses, &transfers);
    let mut rows: Vec<StatementRow> = ledger::running_balance(&account, legs)
        .into_iter()
        .map(|(leg, balance)| StatementRow {
            date: leg.date,
            kind: leg.kind.as_str().to_string(),
            detail: leg.detail,
            amount: format!("{:.2}", leg.amount),
            balance: format!("{:.2}", balance),
        })
        .collect();
    rows.reverse();
    Ok(rows)
}

fn statement(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let account = sub.get_one::<String>("account").unwrap();
    let data = statement_rows(conn, account)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.kind.clone(),
                    r.detail.clone(),
                    r.amount.clone(),
                    r.balance.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "Kind", "Detail", "Amount", "Balance"], rows)
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct ReservationSummaryRow {
    pub currency: String,
    pub reservations: usize,
    pub total: String,
    pub paid: String,
    pub outstanding: String,
}

pub fn reservation_summary(conn: &Connection) -> Result<Vec<ReservationSummaryRow>> {
    use std::collections::BTreeMap;
    let mut agg: BTreeMap<String, (usize, Decimal, Decimal, Decimal)> = BTreeMap::new();
    for r in crate::utils::all_reservations(conn)? {
        let entry = agg.entry(r.currency.clone()).or_default();
        entry.0 += 1;
        entry.1 += r.total_amount;
        entry.2 += r.paid_amount;
        entry.3 += r.balance_amount;
    }
    Ok(agg
        .into_iter()
        .map(
            |(currency, (count, total, paid, outstanding))| ReservationSummaryRow {
                currency,
                reservations: count,
                total: format!("{:.2}", total),
                paid: format!("{:.2}", paid),
                outstanding: format!("{:.2}", outstanding),
            },
        )
        .collect())
}

fn reservations(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = reservation_summary(conn)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.currency.clone(),
                    r.reservations.to_string(),
                    r.total.clone(),
                    r.paid.clone(),
                    r.outstanding.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["CCY", "Reservations", "Total", "Paid", "Outstanding"],
                rows,
            )
        );
    }
    Ok(())
}
