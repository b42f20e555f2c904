// Copyright (c) Lodgekeep Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use lodgekeep::models::{AccountTransfer, Expense, Income, LedgerAccount};
use lodgekeep::{commands, db, ledger};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn account(id: i64, currency: &str, initial: Decimal) -> LedgerAccount {
    LedgerAccount {
        id,
        name: format!("acct-{}", id),
        currency: currency.into(),
        initial_balance: initial,
        location_access: Vec::new(),
    }
}

fn income(id: i64, account_id: i64, amount: i64, created_at: &str) -> Income {
    Income {
        id,
        date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
        account_id,
        amount: Decimal::from(amount),
        currency: "LKR".into(),
        kind: "room".into(),
        payment_method: "cash".into(),
        location_id: 0,
        note: None,
        booking_id: None,
        created_at: created_at.into(),
    }
}

fn expense(id: i64, account_id: i64, amount: i64, created_at: &str) -> Expense {
    Expense {
        id,
        date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
        account_id,
        amount: Decimal::from(amount),
        currency: "LKR".into(),
        main_type: "utilities".into(),
        sub_type: "power".into(),
        location_id: 0,
        note: None,
        created_at: created_at.into(),
    }
}

fn transfer(id: i64, from: i64, to: i64, amount: i64, rate: Decimal) -> AccountTransfer {
    AccountTransfer {
        id,
        from_account_id: from,
        to_account_id: to,
        amount: Decimal::from(amount),
        conversion_rate: rate,
        note: None,
        created_at: "2026-03-03 09:00:00".into(),
    }
}

#[test]
fn balance_fold_matches_formula() {
    let a = account(1, "LKR", Decimal::new(500, 0));
    let incomes = [income(1, 1, 5000, "2026-03-01 08:00:00"), income(2, 1, 250, "2026-03-01 09:00:00")];
    let expenses = [expense(3, 1, 1200, "2026-03-02 08:00:00")];
    let t_in = [transfer(4, 2, 1, 100, Decimal::new(15, 1))]; // credits 150
    let t_out = [transfer(5, 1, 2, 300, Decimal::ONE)];
    let bal = ledger::current_balance(&a, &incomes, &expenses, &t_in, &t_out);
    // 500 + 5250 - 1200 + 150 - 300
    assert_eq!(bal, Decimal::new(4400, 0));
}

#[test]
fn running_balance_sorts_by_entry_time_then_row_id() {
    let a = account(1, "LKR", Decimal::ZERO);
    // Same created_at second; row ids break the tie.
    let incomes = [
        income(7, 1, 100, "2026-03-01 08:00:00"),
        income(3, 1, 50, "2026-03-01 08:00:00"),
    ];
    let expenses = [expense(5, 1, 30, "2026-03-01 08:00:00")];
    let legs = ledger::account_legs(1, &incomes, &expenses, &[]);
    let folded = ledger::running_balance(&a, legs);
    let seqs: Vec<i64> = folded.iter().map(|(leg, _)| leg.seq).collect();
    assert_eq!(seqs, vec![3, 5, 7]);
    let balances: Vec<Decimal> = folded.iter().map(|(_, b)| *b).collect();
    assert_eq!(
        balances,
        vec![Decimal::from(50), Decimal::from(20), Decimal::from(120)]
    );
}

#[test]
fn transfer_credit_leg_applies_conversion_rate() {
    let legs = ledger::account_legs(2, &[], &[], &[transfer(1, 1, 2, 1000, Decimal::new(33, 4))]);
    assert_eq!(legs.len(), 1);
    assert_eq!(legs[0].amount, Decimal::new(33, 1)); // 1000 * 0.0033
}

// End-to-end through the store: income 5000 and expense 1200 on account A,
// then 1000 LKR to a USD account at 0.0033.
#[test]
fn derived_balances_across_a_transfer() {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    commands::currencies::add_custom(&conn, "LKR", Decimal::new(300, 0)).unwrap();
    commands::accounts::add(&conn, "Till", "LKR", Decimal::ZERO, &[]).unwrap();
    commands::accounts::add(&conn, "Bank", "USD", Decimal::ZERO, &[]).unwrap();

    let date = NaiveDate::from_ymd_opt(2026, 4, 1).unwrap();
    commands::income::record(
        &conn, "Till", Decimal::from(5000), date, "room", "cash", 0, None, None,
    )
    .unwrap();
    commands::expenses::record(
        &conn, "Till", Decimal::from(1200), date, "supplies", "kitchen", 0, None,
    )
    .unwrap();

    let rows = commands::reports::balance_rows(&conn, None).unwrap();
    let till = rows.iter().find(|r| r.account == "Till").unwrap();
    assert_eq!(till.balance, "3800.00");

    commands::transfers::execute(
        &conn,
        "Till",
        "Bank",
        Decimal::from(1000),
        Decimal::new(33, 4),
        Some("float top-up"),
    )
    .unwrap();

    let rows = commands::reports::balance_rows(&conn, None).unwrap();
    let till = rows.iter().find(|r| r.account == "Till").unwrap();
    let bank = rows.iter().find(|r| r.account == "Bank").unwrap();
    assert_eq!(till.balance, "2800.00");
    assert_eq!(bank.balance, "3.30");

    // Statement comes back most-recent-first with the fold intact.
    let statement = commands::reports::statement_rows(&conn, "Till").unwrap();
    assert_eq!(statement.len(), 3);
    assert_eq!(statement[0].balance, "2800.00");
    assert_eq!(statement.last().unwrap().balance, "5000.00");
}
