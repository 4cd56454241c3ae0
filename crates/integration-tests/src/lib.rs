//! Live-service integration tests for marketstand.
//!
//! Every test in this crate talks to the real remote service and is marked
//! `#[ignore]`; nothing here runs in a normal `cargo test`.
//!
//! # Running
//!
//! ```bash
//! export MARKET_API_BASE=https://ec-course-api.hexschool.io/v2
//! export MARKET_API_PATH=<your-store-path>
//! export MARKET_USERNAME=<admin email>      # admin tests only
//! export MARKET_PASSWORD=<admin password>   # admin tests only
//!
//! cargo test -p marketstand-integration-tests -- --ignored
//! ```
//!
//! Admin tests create and delete products with a `live-test-` title prefix
//! so leftovers from an interrupted run are recognizable.

use marketstand_client::{ClientConfig, Credentials, StoreClient};

/// Build a client from the live-test environment.
///
/// Panics when configuration is missing; the `#[ignore]`d tests only run
/// when the environment is deliberately set up.
#[must_use]
pub fn live_client() -> StoreClient {
    let config = ClientConfig::from_env().expect("live-test environment not configured");
    StoreClient::new(&config)
}

/// Admin credentials from the live-test environment.
#[must_use]
pub fn live_credentials() -> Credentials {
    let username = std::env::var("MARKET_USERNAME").expect("MARKET_USERNAME not set");
    let password = std::env::var("MARKET_PASSWORD").expect("MARKET_PASSWORD not set");
    Credentials::new(username, password)
}

/// A product title unique to this run.
#[must_use]
pub fn unique_title(label: &str) -> String {
    format!("live-test-{label}-{}", chrono::Utc::now().timestamp_millis())
}
