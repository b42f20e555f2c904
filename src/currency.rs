// Copyright (c) Lodgekeep Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::errors::{LedgerError, LedgerResult};
use crate::models::CurrencyRate;
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

pub const PIVOT: &str = "USD";

/// USD-pivot exchange-rate registry. Every conversion goes through the USD
/// base row, which avoids a pairwise rate table; the USD row itself is seeded
/// at init and protected from mutation.
#[derive(Debug, Clone, Default)]
pub struct CurrencyTable {
    rates: BTreeMap<String, CurrencyRate>,
}

fn normalize(code: &str) -> String {
    code.trim().to_uppercase()
}

fn now_stamp() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

impl CurrencyTable {
    pub fn new(rows: Vec<CurrencyRate>) -> Self {
        let mut rates = BTreeMap::new();
        for r in rows {
            rates.insert(normalize(&r.currency_code), r);
        }
        Self { rates }
    }

    pub fn load(conn: &Connection) -> Result<Self> {
        let mut stmt = conn.prepare(
            "SELECT currency_code, usd_rate, is_custom, updated_at FROM currency_rates",
        )?;
        let rows = stmt.query_map([], |r| {
            Ok((
                r.get::<_, String>(0)?,
                r.get::<_, String>(1)?,
                r.get::<_, bool>(2)?,
                r.get::<_, String>(3)?,
            ))
        })?;
        let mut out = Vec::new();
        for row in rows {
            let (code, rate, is_custom, updated_at) = row?;
            out.push(CurrencyRate {
                usd_rate: crate::utils::parse_decimal(&rate)?,
                currency_code: code,
                is_custom,
                updated_at,
            });
        }
        Ok(Self::new(out))
    }

    pub fn contains(&self, code: &str) -> bool {
        self.rates.contains_key(&normalize(code))
    }

    pub fn iter(&self) -> impl Iterator<Item = &CurrencyRate> {
        self.rates.values()
    }

    /// Units of `code` per 1 USD.
    pub fn rate(&self, code: &str) -> LedgerResult<Decimal> {
        self.rates
            .get(&normalize(code))
            .map(|r| r.usd_rate)
            .ok_or_else(|| LedgerError::UnknownCurrency(normalize(code)))
    }

    /// Convert `amount` from one currency to another through the USD pivot.
    /// Equal codes are an identity, with no rounding applied.
    pub fn convert(&self, amount: Decimal, from: &str, to: &str) -> LedgerResult<Decimal> {
        let from = normalize(from);
        let to = normalize(to);
        if from == to {
            return Ok(amount);
        }
        let from_rate = self.rate(&from)?;
        let to_rate = self.rate(&to)?;
        if from_rate <= Decimal::ZERO {
            return Err(LedgerError::InvalidRate(from_rate));
        }
        Ok(amount / from_rate * to_rate)
    }

    pub fn add_custom(&mut self, code: &str, usd_rate: Decimal) -> LedgerResult<&CurrencyRate> {
        let code = normalize(code);
        if usd_rate <= Decimal::ZERO {
            return Err(LedgerError::InvalidRate(usd_rate));
        }
        if self.rates.contains_key(&code) {
            return Err(LedgerError::DuplicateCurrency(code));
        }
        let row = CurrencyRate {
            currency_code: code.clone(),
            usd_rate,
            is_custom: true,
            updated_at: now_stamp(),
        };
        Ok(self.rates.entry(code).or_insert(row))
    }

    pub fn remove_custom(&mut self, code: &str) -> LedgerResult<CurrencyRate> {
        let code = normalize(code);
        if code == PIVOT {
            return Err(LedgerError::ProtectedCurrency(code));
        }
        match self.rates.remove(&code) {
            Some(r) if r.is_custom => Ok(r),
            Some(r) => {
                // Not custom: put it back untouched.
                self.rates.insert(code.clone(), r);
                Err(LedgerError::NotFound(format!("custom currency '{}'", code)))
            }
            None => Err(LedgerError::NotFound(format!("custom currency '{}'", code))),
        }
    }

    pub fn update_rate(&mut self, code: &str, usd_rate: Decimal) -> LedgerResult<&CurrencyRate> {
        let code = normalize(code);
        if code == PIVOT {
            return Err(LedgerError::ProtectedCurrency(code));
        }
        if usd_rate <= Decimal::ZERO {
            return Err(LedgerError::InvalidRate(usd_rate));
        }
        let row = self
            .rates
            .get_mut(&code)
            .ok_or_else(|| LedgerError::NotFound(format!("currency '{}'", code)))?;
        row.usd_rate = usd_rate;
        row.updated_at = now_stamp();
        Ok(row)
    }
}
