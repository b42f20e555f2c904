// Copyright (c) Lodgekeep Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, params};
use std::fs;
use std::path::PathBuf;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("io.lodgekeep", "Lodgekeep", "lodgekeep"));

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("lodgekeep.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let mut conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&mut conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS currency_rates(
        currency_code TEXT PRIMARY KEY,
        usd_rate TEXT NOT NULL,
        is_custom INTEGER NOT NULL DEFAULT 1,
        updated_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS accounts(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        currency TEXT NOT NULL,
        initial_balance TEXT NOT NULL DEFAULT '0',
        location_access TEXT NOT NULL DEFAULT '[]',
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS income(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        account_id INTEGER NOT NULL,
        amount TEXT NOT NULL,
        currency TEXT NOT NULL,
        type TEXT NOT NULL,
        payment_method TEXT NOT NULL,
        location_id INTEGER NOT NULL DEFAULT 0,
        note TEXT,
        booking_id INTEGER,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(account_id) REFERENCES accounts(id),
        FOREIGN KEY(booking_id) REFERENCES reservations(id)
    );
    CREATE INDEX IF NOT EXISTS idx_income_date ON income(date);
    CREATE INDEX IF NOT EXISTS idx_income_account ON income(account_id);

    CREATE TABLE IF NOT EXISTS expenses(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        account_id INTEGER NOT NULL,
        amount TEXT NOT NULL,
        currency TEXT NOT NULL,
        main_type TEXT NOT NULL,
        sub_type TEXT NOT NULL,
        location_id INTEGER NOT NULL DEFAULT 0,
        note TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(account_id) REFERENCES accounts(id)
    );
    CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses(date);
    CREATE INDEX IF NOT EXISTS idx_expenses_account ON expenses(account_id);

    CREATE TABLE IF NOT EXISTS account_transfers(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        from_account_id INTEGER NOT NULL,
        to_account_id INTEGER NOT NULL,
        amount TEXT NOT NULL,
        conversion_rate TEXT NOT NULL,
        note TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(from_account_id) REFERENCES accounts(id),
        FOREIGN KEY(to_account_id) REFERENCES accounts(id)
    );

    CREATE TABLE IF NOT EXISTS reservations(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        reservation_number TEXT NOT NULL UNIQUE,
        room_rate TEXT NOT NULL,
        nights INTEGER NOT NULL,
        total_amount TEXT NOT NULL,
        paid_amount TEXT NOT NULL DEFAULT '0',
        balance_amount TEXT NOT NULL,
        currency TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'tentative',
        guide_id INTEGER,
        guide_rate TEXT NOT NULL DEFAULT '0',
        guide_commission TEXT NOT NULL DEFAULT '0',
        agent_id INTEGER,
        agent_rate TEXT NOT NULL DEFAULT '0',
        agent_commission TEXT NOT NULL DEFAULT '0',
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS payments(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        payment_number TEXT NOT NULL UNIQUE,
        reservation_id INTEGER NOT NULL,
        account_id INTEGER NOT NULL,
        amount TEXT NOT NULL,
        currency TEXT NOT NULL,
        payment_method TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(reservation_id) REFERENCES reservations(id),
        FOREIGN KEY(account_id) REFERENCES accounts(id)
    );

    -- Per-year counters for reservation/payment numbers. A dedicated counter
    -- rather than counting rows, so two near-simultaneous writes can never
    -- allocate the same number.
    CREATE TABLE IF NOT EXISTS sequences(
        kind TEXT NOT NULL,
        year INTEGER NOT NULL,
        next INTEGER NOT NULL,
        PRIMARY KEY(kind, year)
    );
    "#,
    )?;
    // USD is the pivot row: seeded once, never edited or deleted.
    conn.execute(
        "INSERT OR IGNORE INTO currency_rates(currency_code, usd_rate, is_custom) VALUES ('USD', '1', 0)",
        [],
    )?;
    Ok(())
}

/// Allocate the next sequence value for `kind` ("RES" or "PAY") in `year`.
pub fn next_number(conn: &Connection, kind: &str, year: i32) -> Result<i64> {
    let seq: i64 = conn.query_row(
        "INSERT INTO sequences(kind, year, next) VALUES (?1, ?2, 1)
         ON CONFLICT(kind, year) DO UPDATE SET next = next + 1
         RETURNING next",
        params![kind, year],
        |r| r.get(0),
    )?;
    Ok(seq)
}
