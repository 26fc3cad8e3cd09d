//! Synchronous client core for the Fixer exchange-rate API.
//!
//! # Overview
//! `Exchange` accumulates request options through chained setters, renders
//! the request URL, and parses the JSON body into either a plain rate map or
//! a `Rates` value. The HTTP round-trip is delegated to an injected
//! `Transport`, so building and parsing stay deterministic and testable.
//!
//! # Design
//! - `Exchange` is plain configuration; it never performs I/O on its own.
//! - `build_request` / `parse_rates` / `parse_result` expose the I/O boundary
//!   for callers that run requests themselves; `get` / `get_result` chain
//!   them through a `Transport`.
//! - Every failure is an `ExchangeError`: `Connection` when no body arrived,
//!   `Response` when the body is unusable.
//!
//! ```no_run
//! use fixer_core::{Exchange, UreqTransport};
//!
//! let rates = Exchange::from_env()
//!     .base("USD")
//!     .symbols(["EUR", "GBP"])
//!     .get_result(&UreqTransport::new())?;
//! println!("1 USD = {:?} GBP", rates.get_rate("GBP"));
//! # Ok::<(), fixer_core::ExchangeError>(())
//! ```

pub mod client;
pub mod date;
pub mod error;
pub mod http;
pub mod types;

pub use client::{Exchange, Protocol};
pub use error::ExchangeError;
#[cfg(feature = "ureq")]
pub use http::UreqTransport;
pub use http::{HttpMethod, HttpRequest, Transport, TransportError};
pub use types::{RateMap, Rates};
