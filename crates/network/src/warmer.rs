//! Prefetch backend that warms audio over HTTP

use crate::client::Client;
use recitation_engine::{ResourceAddress, ResourceWarmer};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;

/// Fires one GET per address on a tokio runtime and forgets about it
///
/// Results are only logged. Nothing is reported back to the engine and
/// failed requests are not retried.
#[derive(Clone)]
pub struct HttpWarmer {
    client: Client,
    runtime: Handle,
    in_flight: Arc<AtomicUsize>,
}

impl HttpWarmer {
    pub fn new(client: Client, runtime: Handle) -> Self {
        Self {
            client,
            runtime,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Requests started and not yet finished
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

impl ResourceWarmer for HttpWarmer {
    fn warm(&self, address: &ResourceAddress) {
        let client = self.client.clone();
        let in_flight = Arc::clone(&self.in_flight);
        let url = address.to_string();

        in_flight.fetch_add(1, Ordering::SeqCst);
        self.runtime.spawn(async move {
            match client.fetch_discard(&url).await {
                Ok(bytes) => log::debug!("Warmed {} ({} bytes)", url, bytes),
                Err(e) => log::debug!("Could not warm {}: {}", url, e),
            }
            in_flight.fetch_sub(1, Ordering::SeqCst);
        });
    }
}
