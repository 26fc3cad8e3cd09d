//! Request builder and response parser for the Fixer rates API.
//!
//! # Design
//! `Exchange` is plain configuration: chained setters consume and return it,
//! and nothing in it performs I/O. The request is produced by
//! `build_request`, executed by an injected `Transport`, and the body is
//! handed to `parse_rates` or `parse_result`. Callers that do their own I/O
//! can use the build/parse halves directly; `get` and `get_result` chain the
//! three steps for everyone else.
//!
//! Response bodies are decoded into `serde_json::Value` first so that each
//! validation step runs in a fixed order: JSON syntax, the API's own
//! `"success": false` report, then the presence and shape of the fields.

use std::env;

use chrono::NaiveDate;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::date::{format_date, parse_date};
use crate::error::{ExchangeError, MALFORMED_BODY};
use crate::http::{HttpMethod, HttpRequest, Transport};
use crate::types::{RateMap, Rates};

/// Host and path prefix of the Fixer API.
pub const DEFAULT_HOST: &str = "api.apilayer.com/fixer";

pub const DEFAULT_BASE: &str = "EUR";

/// Environment variable read by `Exchange::from_env`.
pub const API_KEY_ENV: &str = "FIXER_API_KEY";

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "apikey";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Protocol {
    Http,
    #[default]
    Https,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
        }
    }
}

/// Configuration for one rates request.
///
/// Defaults to the latest rates for every currency against `EUR`, over
/// HTTPS, without an API key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    host: String,
    protocol: Protocol,
    base: String,
    symbols: Vec<String>,
    date: Option<NaiveDate>,
    key: Option<String>,
}

impl Default for Exchange {
    fn default() -> Self {
        Self::new()
    }
}

impl Exchange {
    pub fn new() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            protocol: Protocol::default(),
            base: DEFAULT_BASE.to_string(),
            symbols: Vec::new(),
            date: None,
            key: None,
        }
    }

    /// Default configuration with the API key taken from `FIXER_API_KEY`.
    /// A missing or empty variable leaves the key unset.
    pub fn from_env() -> Self {
        let exchange = Self::new();
        match env::var(API_KEY_ENV) {
            Ok(key) if !key.is_empty() => exchange.key(key),
            _ => {
                debug!("{API_KEY_ENV} not set, requests will carry no API key");
                exchange
            }
        }
    }

    /// Host and optional path prefix, without scheme, e.g. `127.0.0.1:3000/fixer`.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into().trim_end_matches('/').to_string();
        self
    }

    pub fn protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    pub fn secure(self) -> Self {
        self.protocol(Protocol::Https)
    }

    pub fn unsecure(self) -> Self {
        self.protocol(Protocol::Http)
    }

    pub fn base(mut self, currency: impl Into<String>) -> Self {
        self.base = currency.into();
        self
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Replace the requested currencies. An empty sequence means all of them.
    ///
    /// Order is kept; repeated and empty codes are dropped.
    pub fn symbols<I, S>(mut self, currencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.symbols.clear();
        for code in currencies {
            self.push_symbol(code.into());
        }
        self
    }

    /// Append one currency to the requested set.
    pub fn symbol(mut self, currency: impl Into<String>) -> Self {
        self.push_symbol(currency.into());
        self
    }

    /// Request every available currency again.
    pub fn clear_symbols(mut self) -> Self {
        self.symbols.clear();
        self
    }

    fn push_symbol(&mut self, code: String) {
        if !code.is_empty() && !self.symbols.contains(&code) {
            self.symbols.push(code);
        }
    }

    /// Ask for the rates published on `date` instead of the latest ones.
    pub fn historical(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Like `historical`, accepting a date or date-time expression such as
    /// `2012-12-12`, `12 December 2012` or `2012-12-12T10:00:00Z`.
    pub fn historical_from(self, expression: &str) -> Result<Self, ExchangeError> {
        match parse_date(expression) {
            Some(date) => Ok(self.historical(date)),
            None => Err(ExchangeError::InvalidDate(expression.to_string())),
        }
    }

    /// Drop any historical date and ask for the latest rates.
    pub fn latest(mut self) -> Self {
        self.date = None;
        self
    }

    pub fn current_base(&self) -> &str {
        &self.base
    }

    pub fn current_symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn current_date(&self) -> Option<NaiveDate> {
        self.date
    }

    /// The URL a request with this configuration would hit.
    pub fn url(&self) -> String {
        let segment = match self.date {
            Some(date) => format_date(date),
            None => "latest".to_string(),
        };
        let mut url = format!(
            "{}://{}/{segment}?base={}",
            self.protocol.as_str(),
            self.host,
            self.base
        );
        if !self.symbols.is_empty() {
            url.push_str("&symbols=");
            url.push_str(&self.symbols.join(","));
        }
        url
    }

    pub fn build_request(&self) -> HttpRequest {
        let mut headers = vec![("Content-Type".to_string(), "text/plain".to_string())];
        if let Some(key) = &self.key {
            headers.push((API_KEY_HEADER.to_string(), key.clone()));
        }
        HttpRequest {
            method: HttpMethod::Get,
            url: self.url(),
            headers,
        }
    }

    /// Fetch the rates as a plain code-to-rate map.
    pub fn get<T: Transport + ?Sized>(&self, transport: &T) -> Result<RateMap, ExchangeError> {
        let body = self.send(transport)?;
        self.parse_rates(&body)
    }

    /// Fetch the rates together with their base currency and date.
    pub fn get_result<T: Transport + ?Sized>(&self, transport: &T) -> Result<Rates, ExchangeError> {
        let body = self.send(transport)?;
        self.parse_result(&body)
    }

    fn send<T: Transport + ?Sized>(&self, transport: &T) -> Result<String, ExchangeError> {
        let request = self.build_request();
        debug!(method = request.method.as_str(), url = %request.url, "requesting exchange rates");
        transport.send(&request).map_err(|e| {
            warn!(url = %request.url, error = %e, "exchange rate request failed");
            ExchangeError::Connection(e.to_string())
        })
    }

    pub fn parse_rates(&self, body: &str) -> Result<RateMap, ExchangeError> {
        let payload = decode(body)?;
        let rates = rates_field(&payload)?;
        debug!(count = rates.len(), "parsed exchange rates");
        Ok(rates)
    }

    pub fn parse_result(&self, body: &str) -> Result<Rates, ExchangeError> {
        let payload = decode(body)?;
        let rates = rates_field(&payload)?;
        let base = payload
            .get("base")
            .and_then(Value::as_str)
            .ok_or_else(ExchangeError::malformed)?;
        let date = payload
            .get("date")
            .and_then(Value::as_str)
            .and_then(parse_date)
            .ok_or_else(ExchangeError::malformed)?;
        debug!(base, %date, count = rates.len(), "parsed exchange rates");
        Ok(Rates::new(base, date, rates))
    }
}

/// Decode the body and surface API-reported failures.
fn decode(body: &str) -> Result<Map<String, Value>, ExchangeError> {
    let payload: Value = serde_json::from_str(body).map_err(|e| ExchangeError::Response {
        message: e.to_string(),
        code: None,
    })?;
    let Value::Object(payload) = payload else {
        return Err(ExchangeError::malformed());
    };

    if let Some(Value::Bool(false)) = payload.get("success") {
        let error = payload.get("error");
        let message = error
            .and_then(|e| e.get("info"))
            .and_then(Value::as_str)
            .unwrap_or(MALFORMED_BODY)
            .to_string();
        let code = error.and_then(|e| e.get("code")).and_then(Value::as_i64);
        warn!(?code, %message, "exchange rate API reported an error");
        return Err(ExchangeError::Response { message, code });
    }

    Ok(payload)
}

fn rates_field(payload: &Map<String, Value>) -> Result<RateMap, ExchangeError> {
    let Some(Value::Object(rates)) = payload.get("rates") else {
        return Err(ExchangeError::malformed());
    };
    // A null rate counts as absent; any other non-number spoils the body.
    rates
        .iter()
        .filter(|(_, rate)| !rate.is_null())
        .map(|(code, rate)| {
            rate.as_f64()
                .map(|rate| (code.clone(), rate))
                .ok_or_else(ExchangeError::malformed)
        })
        .collect()
}
