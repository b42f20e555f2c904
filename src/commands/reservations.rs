// Copyright (c) Lodgekeep Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Reservation, ReservationStatus};
use crate::settlement::{self, ReservationInput};
use crate::utils::{
    account_by_id, maybe_print_json, parse_decimal, pretty_table, reservation_by_number,
};
use anyhow::Result;
use rusqlite::{Connection, params};
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let input = ReservationInput {
                room_rate: parse_decimal(sub.get_one::<String>("room-rate").unwrap())?,
                nights: *sub.get_one::<u32>("nights").unwrap(),
                total_override: sub
                    .get_one::<String>("total")
                    .map(|s| parse_decimal(s))
                    .transpose()?,
                currency: sub.get_one::<String>("currency").unwrap().to_uppercase(),
                guide_id: sub.get_one::<i64>("guide").copied(),
                guide_rate: parse_decimal(sub.get_one::<String>("guide-rate").unwrap())?,
                agent_id: sub.get_one::<i64>("agent").copied(),
                agent_rate: parse_decimal(sub.get_one::<String>("agent-rate").unwrap())?,
            };
            let res = create(conn, input)?;
            println!(
                "Created reservation {} ({} x {} nights = {} {})",
                res.reservation_number, res.room_rate, res.nights, res.total_amount, res.currency
            );
        }
        Some(("list", sub)) => list(conn, sub)?,
        Some(("show", sub)) => show(conn, sub.get_one::<String>("number").unwrap())?,
        Some(("set-total", sub)) => {
            let number = sub.get_one::<String>("number").unwrap();
            let total = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
            let res = set_total(conn, number, total)?;
            println!(
                "Reservation {} total {} -> balance {}, guide commission {}, agent commission {}",
                res.reservation_number,
                res.total_amount,
                res.balance_amount,
                res.guide_commission,
                res.agent_commission
            );
        }
        Some(("set-status", sub)) => {
            let number = sub.get_one::<String>("number").unwrap();
            let status = sub
                .get_one::<String>("status")
                .unwrap()
                .parse::<ReservationStatus>()
                .map_err(anyhow::Error::msg)?;
            let changed = conn.execute(
                "UPDATE reservations SET status=?2 WHERE reservation_number=?1",
                params![number, status.as_str()],
            )?;
            if changed == 0 {
                anyhow::bail!("Reservation '{}' not found", number);
            }
            println!("Reservation {} is now {}", number, status);
        }
        _ => {}
    }
    Ok(())
}

pub fn create(conn: &Connection, input: ReservationInput) -> Result<Reservation> {
    let year = chrono::Utc::now().format("%Y").to_string().parse::<i32>()?;
    let seq = crate::db::next_number(conn, "RES", year)?;
    let res = settlement::new_reservation(settlement::reservation_number(year, seq), input);
    conn.execute(
        "INSERT INTO reservations(reservation_number, room_rate, nights, total_amount, paid_amount,
             balance_amount, currency, status, guide_id, guide_rate, guide_commission,
             agent_id, agent_rate, agent_commission)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        params![
            res.reservation_number,
            res.room_rate.to_string(),
            res.nights,
            res.total_amount.to_string(),
            res.paid_amount.to_string(),
            res.balance_amount.to_string(),
            res.currency,
            res.status.as_str(),
            res.guide_id,
            res.guide_rate.to_string(),
            res.guide_commission.to_string(),
            res.agent_id,
            res.agent_rate.to_string(),
            res.agent_commission.to_string()
        ],
    )?;
    Ok(Reservation {
        id: conn.last_insert_rowid(),
        ..res
    })
}

pub fn set_total(
    conn: &Connection,
    number: &str,
    new_total: rust_decimal::Decimal,
) -> Result<Reservation> {
    let mut res = reservation_by_number(conn, number)?;
    settlement::retotal(&mut res, new_total);
    conn.execute(
        "UPDATE reservations SET total_amount=?2, balance_amount=?3, guide_commission=?4, agent_commission=?5
         WHERE reservation_number=?1",
        params![
            number,
            res.total_amount.to_string(),
            res.balance_amount.to_string(),
            res.guide_commission.to_string(),
            res.agent_commission.to_string()
        ],
    )?;
    Ok(res)
}

#[derive(Serialize)]
pub struct ReservationRow {
    pub number: String,
    pub total: String,
    pub paid: String,
    pub balance: String,
    pub currency: String,
    pub status: String,
}

pub fn query_rows(conn: &Connection) -> Result<Vec<ReservationRow>> {
    Ok(crate::utils::all_reservations(conn)?
        .into_iter()
        .map(|r| ReservationRow {
            number: r.reservation_number,
            total: format!("{:.2}", r.total_amount),
            paid: format!("{:.2}", r.paid_amount),
            balance: format!("{:.2}", r.balance_amount),
            currency: r.currency,
            status: r.status.to_string(),
        })
        .collect())
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
                    r.number.clone(),
                    r.total.clone(),
                    r.paid.clone(),
                    r.balance.clone(),
                    r.currency.clone(),
                    r.status.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Number", "Total", "Paid", "Balance", "CCY", "Status"],
                rows,
            )
        );
    }
    Ok(())
}

fn show(conn: &Connection, number: &str) -> Result<()> {
    let res = reservation_by_number(conn, number)?;
    let mut head = vec![
        vec!["Number".into(), res.reservation_number.clone()],
        vec![
            "Room rate".into(),
            format!("{} x {} nights", res.room_rate, res.nights),
        ],
        vec![
            "Total".into(),
            format!("{:.2} {}", res.total_amount, res.currency),
        ],
        vec!["Paid".into(), format!("{:.2}", res.paid_amount)],
        vec!["Balance".into(), format!("{:.2}", res.balance_amount)],
        vec!["Status".into(), res.status.to_string()],
    ];
    if res.guide_id.is_some() {
        head.push(vec![
            "Guide commission".into(),
            format!("{:.2} ({}%)", res.guide_commission, res.guide_rate),
        ]);
    }
    if res.agent_id.is_some() {
        head.push(vec![
            "Agent commission".into(),
            format!("{:.2} ({}%)", res.agent_commission, res.agent_rate),
        ]);
    }
    println!("{}", pretty_table(&["Field", "Value"], head));

    let payments = crate::utils::payments_for_reservation(conn, res.id)?;
    if !payments.is_empty() {
        let mut rows = Vec::new();
        for p in payments {
            let account = account_by_id(conn, p.account_id)?;
            rows.push(vec![
                p.payment_number,
                format!("{:.2}", p.amount),
                p.currency,
                p.payment_method,
                account.name,
            ]);
        }
        println!(
            "{}",
            pretty_table(&["Payment", "Amount", "CCY", "Method", "Account"], rows)
        );
    }
    Ok(())
}
