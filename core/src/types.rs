//! Domain types for Fixer responses.
//!
//! # Design
//! The API never lists the base currency among its own rates, so `Rates`
//! answers lookups for the base code with `1.0`. A rate of zero is treated
//! the same as a missing one.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Currency code to rate, where a rate is the price of one unit of the base
/// currency expressed in that currency.
pub type RateMap = BTreeMap<String, f64>;

/// A successful rates response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rates {
    base: String,
    date: NaiveDate,
    rates: RateMap,
}

impl Rates {
    pub fn new(base: impl Into<String>, date: NaiveDate, rates: RateMap) -> Self {
        Self {
            base: base.into(),
            date,
            rates,
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Day the rates were published for.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn rates(&self) -> &RateMap {
        &self.rates
    }

    /// Rate for `code`, `Some(1.0)` for the base currency, `None` when the
    /// code is unknown or its rate is zero.
    pub fn get_rate(&self, code: &str) -> Option<f64> {
        if code == self.base {
            return Some(1.0);
        }
        self.rates.get(code).copied().filter(|rate| *rate != 0.0)
    }

    /// Convert `amount` of the base currency into `code`.
    pub fn convert(&self, amount: f64, code: &str) -> Option<f64> {
        self.get_rate(code).map(|rate| amount * rate)
    }
}
