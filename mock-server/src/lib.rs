//! In-process imitation of the Fixer rates endpoints.
//!
//! Serves `GET /fixer/latest` and `GET /fixer/{YYYY-MM-DD}` from a fixed
//! EUR-denominated table, rebased on the requested `base` and filtered by
//! `symbols`. Failures are reported the way Fixer does it: HTTP 200 with
//! `"success": false` and an `error` object.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    routing::get,
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tracing::debug;

/// Key accepted by `app()`.
pub const API_KEY: &str = "test-key";

const EUR_RATES: &[(&str, f64)] = &[
    ("AUD", 1.6402),
    ("CAD", 1.4731),
    ("CHF", 0.9612),
    ("EUR", 1.0),
    ("GBP", 0.8571),
    ("INR", 90.12),
    ("JPY", 161.47),
    ("USD", 1.0856),
];

#[derive(Debug, Deserialize)]
pub struct RatesQuery {
    pub base: Option<String>,
    pub symbols: Option<String>,
}

/// Body of a successful response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RatesBody {
    pub success: bool,
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub historical: bool,
    pub base: String,
    pub date: String,
    pub rates: BTreeMap<String, f64>,
}

struct Config {
    api_key: String,
    table: BTreeMap<String, f64>,
}

type Shared = Arc<Config>;

pub fn app() -> Router {
    app_with_key(API_KEY)
}

/// Router that only answers requests carrying `api_key` in the `apikey` header.
pub fn app_with_key(api_key: &str) -> Router {
    let config = Config {
        api_key: api_key.to_string(),
        table: EUR_RATES
            .iter()
            .map(|(code, rate)| (code.to_string(), *rate))
            .collect(),
    };
    Router::new()
        .route("/fixer/latest", get(latest))
        .route("/fixer/{date}", get(historical))
        .with_state(Arc::new(config))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn latest(
    State(config): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<RatesQuery>,
) -> Json<Value> {
    let today = Utc::now().date_naive();
    Json(respond(&config, &headers, &query, today, false))
}

async fn historical(
    State(config): State<Shared>,
    headers: HeaderMap,
    Path(date): Path<String>,
    Query(query): Query<RatesQuery>,
) -> Json<Value> {
    match NaiveDate::parse_from_str(&date, "%Y-%m-%d") {
        Ok(date) => Json(respond(&config, &headers, &query, date, true)),
        Err(_) => Json(failure(
            302,
            "invalid_date",
            "You have entered an invalid date. [Required format: date=YYYY-MM-DD]",
        )),
    }
}

fn respond(
    config: &Config,
    headers: &HeaderMap,
    query: &RatesQuery,
    date: NaiveDate,
    historical: bool,
) -> Value {
    let key = headers.get("apikey").and_then(|v| v.to_str().ok()).unwrap_or("");
    if key.is_empty() {
        return failure(101, "missing_access_key", "You have not supplied an API Access Key.");
    }
    if key != config.api_key {
        return failure(101, "invalid_access_key", "You have not supplied a valid API Access Key.");
    }

    let base = query.base.as_deref().unwrap_or("EUR");
    let Some(base_rate) = config.table.get(base).copied() else {
        return failure(201, "invalid_base_currency", "An invalid base currency has been entered.");
    };

    let wanted: Vec<&str> = query
        .symbols
        .as_deref()
        .map(|s| s.split(',').filter(|c| !c.is_empty()).collect())
        .unwrap_or_default();
    if wanted.iter().any(|code| !config.table.contains_key(*code)) {
        return failure(
            202,
            "invalid_currency_codes",
            "You have provided one or more invalid Currency Codes. [Required format: currencies=EUR,USD,GBP,...]",
        );
    }

    let rates = config
        .table
        .iter()
        .filter(|(code, _)| code.as_str() != base)
        .filter(|(code, _)| wanted.is_empty() || wanted.contains(&code.as_str()))
        .map(|(code, rate)| (code.clone(), round6(rate / base_rate)))
        .collect();

    debug!(base, %date, historical, "serving rates");
    let body = RatesBody {
        success: true,
        timestamp: Utc::now().timestamp(),
        historical,
        base: base.to_string(),
        date: date.format("%Y-%m-%d").to_string(),
        rates,
    };
    serde_json::to_value(body)
        .unwrap_or_else(|_| failure(500, "internal_error", "Failed to encode rates."))
}

fn failure(code: i64, kind: &str, info: &str) -> Value {
    json!({
        "success": false,
        "error": { "code": code, "type": kind, "info": info },
    })
}

fn round6(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}
