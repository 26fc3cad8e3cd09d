//! End-to-end requests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives `Exchange` over real
//! HTTP with `UreqTransport`. Checks that the URLs and headers the core
//! builds are understood by a Fixer-shaped server and that its replies parse.
#![cfg(feature = "ureq")]

use std::net::SocketAddr;

use fixer_core::{Exchange, ExchangeError, UreqTransport};

/// Start the mock server on a random port and return its address.
fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

fn exchange(addr: SocketAddr) -> Exchange {
    Exchange::new()
        .unsecure()
        .host(format!("{addr}/fixer"))
        .key(mock_server::API_KEY)
}

#[test_log::test]
fn latest_rates_round_trip() {
    let addr = start_server();
    let transport = UreqTransport::new();

    // Step 1: map form, every currency.
    let rates = exchange(addr).get(&transport).unwrap();
    assert!(!rates.contains_key("EUR"));
    assert_eq!(rates.get("GBP"), Some(&0.8571));

    // Step 2: result form, rebased and filtered.
    let result = exchange(addr)
        .base("USD")
        .symbols(["EUR", "GBP"])
        .get_result(&transport)
        .unwrap();
    assert_eq!(result.base(), "USD");
    assert_eq!(result.rates().len(), 2);
    assert_eq!(result.get_rate("USD"), Some(1.0));
    assert!(result.get_rate("EUR").is_some());
    assert_eq!(result.get_rate("JPY"), None);
}

#[test_log::test]
fn historical_rates_carry_requested_date() {
    let addr = start_server();
    let result = exchange(addr)
        .historical_from("12 December 2012")
        .unwrap()
        .get_result(&UreqTransport::new())
        .unwrap();
    assert_eq!(result.date().to_string(), "2012-12-12");
}

#[test_log::test]
fn missing_key_is_api_error() {
    let addr = start_server();
    let err = Exchange::new()
        .unsecure()
        .host(format!("{addr}/fixer"))
        .get(&UreqTransport::new())
        .unwrap_err();
    assert!(err.is_response(), "unexpected error: {err:?}");
    assert_eq!(err.code(), Some(101));
}

#[test_log::test]
fn unknown_symbol_is_api_error() {
    let addr = start_server();
    let err = exchange(addr)
        .symbols(["USD", "XYZ"])
        .get_result(&UreqTransport::new())
        .unwrap_err();
    assert_eq!(err.code(), Some(202));
}

#[test_log::test]
fn non_success_status_is_connection_error() {
    let addr = start_server();
    let err = exchange(addr)
        .host(format!("{addr}/not-fixer"))
        .get(&UreqTransport::new())
        .unwrap_err();
    assert!(matches!(err, ExchangeError::Connection(_)), "unexpected error: {err:?}");
}

#[test_log::test]
fn refused_connection_is_connection_error() {
    // Bind then drop to find a port nobody is listening on.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let err = exchange(addr).get_result(&UreqTransport::new()).unwrap_err();
    assert!(err.is_connection(), "unexpected error: {err:?}");
}
