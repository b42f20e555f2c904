// Copyright (c) Lodgekeep Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sentinel payment method for income that is logged but not yet collected.
pub const PENDING_METHOD: &str = "pending";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerAccount {
    pub id: i64,
    pub name: String,
    pub currency: String,
    pub initial_balance: Decimal,
    /// Location ids this account is visible to; empty means unrestricted.
    pub location_access: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyRate {
    pub currency_code: String,
    /// Units of this currency per 1 USD.
    pub usd_rate: Decimal,
    pub is_custom: bool,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Income {
    pub id: i64,
    pub date: NaiveDate,
    pub account_id: i64,
    pub amount: Decimal,
    /// Account currency cached at recording time.
    pub currency: String,
    pub kind: String,
    pub payment_method: String,
    pub location_id: i64,
    pub note: Option<String>,
    pub booking_id: Option<i64>,
    pub created_at: String,
}

impl Income {
    pub fn is_pending(&self) -> bool {
        self.payment_method == PENDING_METHOD
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub date: NaiveDate,
    pub account_id: i64,
    pub amount: Decimal,
    pub currency: String,
    pub main_type: String,
    pub sub_type: String,
    pub location_id: i64,
    pub note: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountTransfer {
    pub id: i64,
    pub from_account_id: i64,
    pub to_account_id: i64,
    /// Denominated in the source account's currency.
    pub amount: Decimal,
    /// Units of destination currency per unit of source currency.
    pub conversion_rate: Decimal,
    pub note: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Tentative,
    Confirmed,
    CheckedIn,
    CheckedOut,
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Tentative => "tentative",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::CheckedIn => "checked_in",
            ReservationStatus::CheckedOut => "checked_out",
            ReservationStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tentative" => Ok(ReservationStatus::Tentative),
            "confirmed" => Ok(ReservationStatus::Confirmed),
            "checked_in" => Ok(ReservationStatus::CheckedIn),
            "checked_out" => Ok(ReservationStatus::CheckedOut),
            "cancelled" => Ok(ReservationStatus::Cancelled),
            other => Err(format!("unknown reservation status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i64,
    pub reservation_number: String,
    pub room_rate: Decimal,
    pub nights: u32,
    pub total_amount: Decimal,
    pub paid_amount: Decimal,
    pub balance_amount: Decimal,
    pub currency: String,
    pub status: ReservationStatus,
    pub guide_id: Option<i64>,
    /// Commission percentage for the guide; kept so commissions can be
    /// recomputed when the total changes.
    pub guide_rate: Decimal,
    pub guide_commission: Decimal,
    pub agent_id: Option<i64>,
    pub agent_rate: Decimal,
    pub agent_commission: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    pub payment_number: String,
    pub reservation_id: i64,
    pub account_id: i64,
    pub amount: Decimal,
    pub currency: String,
    pub payment_method: String,
}
