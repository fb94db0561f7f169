//! Test doubles for the extraction engine.
//!
//! `MockTransport` is a HashMap-based `HttpTransport`: register URL→response
//! pairs with the builder methods, then assert on the recorded call log.
//! Unregistered URLs fail with a transport error, which is exactly how a
//! dead site looks to a strategy.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use statline_core::{ExtractError, ExtractResult, HttpTransport, Identity};

/// Scripted transport with per-URL latency and a call log.
pub struct MockTransport {
    get_bodies: HashMap<String, String>,
    post_bodies: HashMap<String, serde_json::Value>,
    /// (url substring, latency); first match wins.
    delays: Vec<(String, Duration)>,
    calls: Mutex<Vec<String>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            get_bodies: HashMap::new(),
            post_bodies: HashMap::new(),
            delays: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Register a GET response body (HTML or JSON text) for an exact URL.
    pub fn on_get(mut self, url: &str, body: &str) -> Self {
        self.get_bodies.insert(url.to_string(), body.to_string());
        self
    }

    /// Register a POST-JSON response for an exact URL.
    pub fn on_post(mut self, url: &str, response: serde_json::Value) -> Self {
        self.post_bodies.insert(url.to_string(), response);
        self
    }

    /// Add simulated latency for any URL containing `needle`.
    pub fn delay_on(mut self, needle: &str, latency: Duration) -> Self {
        self.delays.push((needle.to_string(), latency));
        self
    }

    // --- Assertion helpers ---

    /// Total number of requests made, across GET and POST.
    pub fn request_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Number of requests whose URL contains `needle`.
    pub fn requests_matching(&self, needle: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|url| url.contains(needle))
            .count()
    }

    /// All requested URLs in call order.
    pub fn requested_urls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    async fn record(&self, url: &str) {
        self.calls.lock().unwrap().push(url.to_string());
        let delay = self
            .delays
            .iter()
            .find(|(needle, _)| url.contains(needle))
            .map(|(_, latency)| *latency);
        if let Some(latency) = delay {
            tokio::time::sleep(latency).await;
        }
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn get(
        &self,
        url: &str,
        _identity: &Identity,
        _timeout: Duration,
    ) -> ExtractResult<String> {
        self.record(url).await;
        self.get_bodies.get(url).cloned().ok_or_else(|| {
            ExtractError::transport(url, "MockTransport: no GET response registered")
        })
    }

    async fn post_json(
        &self,
        url: &str,
        _body: &serde_json::Value,
        _identity: &Identity,
        _timeout: Duration,
    ) -> ExtractResult<serde_json::Value> {
        self.record(url).await;
        self.post_bodies.get(url).cloned().ok_or_else(|| {
            ExtractError::transport(url, "MockTransport: no POST response registered")
        })
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use statline_core::IdentityPool;

    #[tokio::test]
    async fn unregistered_urls_fail_and_calls_are_logged() {
        let transport = MockTransport::new().on_get("https://a.example/x", "<html></html>");
        let identity = IdentityPool::pick();

        let ok = transport
            .get("https://a.example/x", identity, Duration::from_secs(1))
            .await;
        assert!(ok.is_ok());

        let missing = transport
            .get("https://a.example/y", identity, Duration::from_secs(1))
            .await;
        assert!(matches!(missing, Err(ExtractError::Transport { .. })));

        assert_eq!(transport.request_count(), 2);
        assert_eq!(transport.requests_matching("a.example"), 2);
    }
}
