//! Best-effort transport for the vitals payload.
//!
//! One POST per included page view, fired shortly after load. Failures are
//! swallowed with a warning; the host page never sees them.

use super::VitalsPayload;
use log::warn;
use std::time::Duration;

/// Delay between page load and the payload send.
pub const SEND_DELAY: Duration = Duration::from_secs(2);

/// Transport for the session payload.
///
/// Implementations must be fire-and-forget: they log failures and return,
/// never propagating an error to the caller.
pub trait Beacon {
    /// Send the payload to the endpoint, best-effort.
    fn send(&self, endpoint: &str, payload: &VitalsPayload);
}

/// HTTP beacon using a short-timeout blocking client.
pub struct HttpBeacon {
    client: reqwest::blocking::Client,
}

impl HttpBeacon {
    /// Create a beacon with a bounded request timeout.
    pub fn new() -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(3))
            .build()
            .unwrap_or_default();
        Self { client }
    }

    /// Spawn a detached thread that waits [`SEND_DELAY`] and then sends.
    ///
    /// The returned handle may be joined in tests; production callers drop
    /// it so the send never blocks interactivity.
    pub fn send_after_load(
        self,
        endpoint: String,
        payload: VitalsPayload,
    ) -> std::thread::JoinHandle<()> {
        std::thread::spawn(move || {
            std::thread::sleep(SEND_DELAY);
            self.send(&endpoint, &payload);
        })
    }
}

impl Default for HttpBeacon {
    fn default() -> Self {
        Self::new()
    }
}

impl Beacon for HttpBeacon {
    fn send(&self, endpoint: &str, payload: &VitalsPayload) {
        match self.client.post(endpoint).json(payload).send() {
            Ok(response) if !response.status().is_success() => {
                warn!(
                    "vitals beacon to {} returned status {}",
                    endpoint,
                    response.status()
                );
            }
            Ok(_) => {}
            Err(e) => {
                warn!("vitals beacon to {} failed: {}", endpoint, e);
            }
        }
    }
}
