// src/coordinator/client.rs

use std::sync::Arc;

use tokio::sync::Notify;

/// The party waiting for "finished jobs are ready" signals.
///
/// Cloning shares the same signal. A wake-up sent while nobody is waiting
/// is kept until the next [`GaswClient::notified`] call.
#[derive(Debug, Clone, Default)]
pub struct GaswClient {
    signal: Arc<Notify>,
}

impl GaswClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until the coordinator signals that finished jobs are pending.
    pub async fn notified(&self) {
        self.signal.notified().await;
    }

    /// Whether `other` shares this client's signal.
    pub fn is_same(&self, other: &GaswClient) -> bool {
        Arc::ptr_eq(&self.signal, &other.signal)
    }

    pub(crate) fn wake(&self) {
        self.signal.notify_one();
    }
}
