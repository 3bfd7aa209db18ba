#![allow(dead_code)]

use std::error::Error;
use std::time::Duration;

use gasw::coordinator::GaswClient;

pub use gasw_test_utils::init_tracing;

pub type TestResult = Result<(), Box<dyn Error>>;

/// Whether `client` is woken within `within`.
pub async fn woken_within(client: &GaswClient, within: Duration) -> bool {
    tokio::time::timeout(within, client.notified()).await.is_ok()
}
