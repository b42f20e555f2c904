// Copyright (c) Lodgekeep Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{
    AccountTransfer, Expense, Income, LedgerAccount, Payment, Reservation, ReservationStatus,
};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rusqlite::{Connection, Row, params};
use rust_decimal::Decimal;

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn fmt_money(d: &Decimal, ccy: &str) -> String {
    format!("{} {}", ccy, d.round_dp(2))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

fn account_from_row(r: &Row<'_>) -> Result<LedgerAccount> {
    let initial: String = r.get(3)?;
    let locations: String = r.get(4)?;
    Ok(LedgerAccount {
        id: r.get(0)?,
        name: r.get(1)?,
        currency: r.get(2)?,
        initial_balance: parse_decimal(&initial)?,
        location_access: serde_json::from_str(&locations)
            .with_context(|| format!("Invalid location_access '{}'", locations))?,
    })
}

const ACCOUNT_COLS: &str = "id, name, currency, initial_balance, location_access";

pub fn account_by_name(conn: &Connection, name: &str) -> Result<LedgerAccount> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM accounts WHERE name=?1",
        ACCOUNT_COLS
    ))?;
    let mut rows = stmt.query(params![name])?;
    let row = rows
        .next()?
        .with_context(|| format!("Account '{}' not found", name))?;
    account_from_row(row)
}

pub fn account_by_id(conn: &Connection, id: i64) -> Result<LedgerAccount> {
    let mut stmt = conn.prepare(&format!("SELECT {} FROM accounts WHERE id=?1", ACCOUNT_COLS))?;
    let mut rows = stmt.query(params![id])?;
    let row = rows
        .next()?
        .with_context(|| format!("Account id {} not found", id))?;
    account_from_row(row)
}

pub fn all_accounts(conn: &Connection) -> Result<Vec<LedgerAccount>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM accounts ORDER BY name",
        ACCOUNT_COLS
    ))?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        out.push(account_from_row(r)?);
    }
    Ok(out)
}

pub fn incomes_for_account(conn: &Connection, account_id: i64) -> Result<Vec<Income>> {
    let mut stmt = conn.prepare(
        "SELECT id, date, account_id, amount, currency, type, payment_method, location_id, note, booking_id, created_at
         FROM income WHERE account_id=?1 ORDER BY id",
    )?;
    let mut rows = stmt.query(params![account_id])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let date: String = r.get(1)?;
        let amount: String = r.get(3)?;
        out.push(Income {
            id: r.get(0)?,
            date: parse_date(&date)?,
            account_id: r.get(2)?,
            amount: parse_decimal(&amount)?,
            currency: r.get(4)?,
            kind: r.get(5)?,
            payment_method: r.get(6)?,
            location_id: r.get(7)?,
            note: r.get(8)?,
            booking_id: r.get(9)?,
            created_at: r.get(10)?,
        });
    }
    Ok(out)
}

pub fn expenses_for_account(conn: &Connection, account_id: i64) -> Result<Vec<Expense>> {
    let mut stmt = conn.prepare(
        "SELECT id, date, account_id, amount, currency, main_type, sub_type, location_id, note, created_at
         FROM expenses WHERE account_id=?1 ORDER BY id",
    )?;
    let mut rows = stmt.query(params![account_id])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let date: String = r.get(1)?;
        let amount: String = r.get(3)?;
        out.push(Expense {
            id: r.get(0)?,
            date: parse_date(&date)?,
            account_id: r.get(2)?,
            amount: parse_decimal(&amount)?,
            currency: r.get(4)?,
            main_type: r.get(5)?,
            sub_type: r.get(6)?,
            location_id: r.get(7)?,
            note: r.get(8)?,
            created_at: r.get(9)?,
        });
    }
    Ok(out)
}

pub fn transfers_touching_account(conn: &Connection, account_id: i64) -> Result<Vec<AccountTransfer>> {
    let mut stmt = conn.prepare(
        "SELECT id, from_account_id, to_account_id, amount, conversion_rate, note, created_at
         FROM account_transfers WHERE from_account_id=?1 OR to_account_id=?1 ORDER BY id",
    )?;
    let mut rows = stmt.query(params![account_id])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        out.push(transfer_from_row(r)?);
    }
    Ok(out)
}

pub fn transfer_from_row(r: &Row<'_>) -> Result<AccountTransfer> {
    let amount: String = r.get(3)?;
    let rate: String = r.get(4)?;
    Ok(AccountTransfer {
        id: r.get(0)?,
        from_account_id: r.get(1)?,
        to_account_id: r.get(2)?,
        amount: parse_decimal(&amount)?,
        conversion_rate: parse_decimal(&rate)?,
        note: r.get(5)?,
        created_at: r.get(6)?,
    })
}

const RESERVATION_COLS: &str = "id, reservation_number, room_rate, nights, total_amount, \
     paid_amount, balance_amount, currency, status, guide_id, guide_rate, guide_commission, \
     agent_id, agent_rate, agent_commission";

fn reservation_from_row(r: &Row<'_>) -> Result<Reservation> {
    let room_rate: String = r.get(2)?;
    let total: String = r.get(4)?;
    let paid: String = r.get(5)?;
    let balance: String = r.get(6)?;
    let status: String = r.get(8)?;
    let guide_rate: String = r.get(10)?;
    let guide_commission: String = r.get(11)?;
    let agent_rate: String = r.get(13)?;
    let agent_commission: String = r.get(14)?;
    Ok(Reservation {
        id: r.get(0)?,
        reservation_number: r.get(1)?,
        room_rate: parse_decimal(&room_rate)?,
        nights: r.get(3)?,
        total_amount: parse_decimal(&total)?,
        paid_amount: parse_decimal(&paid)?,
        balance_amount: parse_decimal(&balance)?,
        currency: r.get(7)?,
        status: status
            .parse::<ReservationStatus>()
            .map_err(anyhow::Error::msg)?,
        guide_id: r.get(9)?,
        guide_rate: parse_decimal(&guide_rate)?,
        guide_commission: parse_decimal(&guide_commission)?,
        agent_id: r.get(12)?,
        agent_rate: parse_decimal(&agent_rate)?,
        agent_commission: parse_decimal(&agent_commission)?,
    })
}

pub fn reservation_by_number(conn: &Connection, number: &str) -> Result<Reservation> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM reservations WHERE reservation_number=?1",
        RESERVATION_COLS
    ))?;
    let mut rows = stmt.query(params![number])?;
    let row = rows
        .next()?
        .with_context(|| format!("Reservation '{}' not found", number))?;
    reservation_from_row(row)
}

pub fn all_reservations(conn: &Connection) -> Result<Vec<Reservation>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM reservations ORDER BY reservation_number",
        RESERVATION_COLS
    ))?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        out.push(reservation_from_row(r)?);
    }
    Ok(out)
}

pub fn payments_for_reservation(conn: &Connection, reservation_id: i64) -> Result<Vec<Payment>> {
    let mut stmt = conn.prepare(
        "SELECT id, payment_number, reservation_id, account_id, amount, currency, payment_method
         FROM payments WHERE reservation_id=?1 ORDER BY id",
    )?;
    let mut rows = stmt.query(params![reservation_id])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let amount: String = r.get(4)?;
        out.push(Payment {
            id: r.get(0)?,
            payment_number: r.get(1)?,
            reservation_id: r.get(2)?,
            account_id: r.get(3)?,
            amount: parse_decimal(&amount)?,
            currency: r.get(5)?,
            payment_method: r.get(6)?,
        });
    }
    Ok(out)
}
