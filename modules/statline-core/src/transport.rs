//! HTTP transport seam.
//!
//! Strategies never touch reqwest directly; they go through `HttpTransport`
//! so tests can swap in scripted doubles and count calls.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use tracing::debug;

use crate::error::{ExtractError, ExtractResult};
use crate::identity::Identity;

/// Transport used by every extraction strategy. Implementations must inject
/// the given identity's headers, honor the per-call timeout, and follow
/// redirects.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// GET a page and return its body as text.
    async fn get(
        &self,
        url: &str,
        identity: &Identity,
        timeout: Duration,
    ) -> ExtractResult<String>;

    /// GET a JSON endpoint.
    async fn get_json(
        &self,
        url: &str,
        identity: &Identity,
        timeout: Duration,
    ) -> ExtractResult<serde_json::Value> {
        let body = self.get(url, identity, timeout).await?;
        serde_json::from_str(&body)
            .map_err(|e| ExtractError::Structure(format!("invalid JSON from {url}: {e}")))
    }

    /// POST a JSON body and return the JSON response.
    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
        identity: &Identity,
        timeout: Duration,
    ) -> ExtractResult<serde_json::Value>;

    /// Transport name for logging.
    fn name(&self) -> &str {
        "unknown"
    }
}

/// Production transport backed by a shared `reqwest::Client`.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .redirect(reqwest::redirect::Policy::limited(5))
                .build()
                .expect("Failed to build HTTP client"),
        }
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn identity_headers(identity: &Identity) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(ua) = HeaderValue::from_str(identity.user_agent) {
            headers.insert(USER_AGENT, ua);
        }
        for (name, value) in identity.headers {
            let (Ok(name), Ok(value)) = (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) else {
                continue;
            };
            headers.insert(name, value);
        }
        headers
    }

    fn map_error(url: &str, e: reqwest::Error) -> ExtractError {
        if e.is_timeout() {
            ExtractError::Timeout {
                url: url.to_string(),
            }
        } else {
            ExtractError::transport(url, e)
        }
    }

    async fn send_checked(
        &self,
        request: reqwest::RequestBuilder,
        url: &str,
    ) -> ExtractResult<reqwest::Response> {
        let response = request
            .send()
            .await
            .map_err(|e| Self::map_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractError::transport(
                url,
                format!("HTTP {status}"),
            ));
        }
        debug!(url, status = status.as_u16(), "Request succeeded");
        Ok(response)
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(
        &self,
        url: &str,
        identity: &Identity,
        timeout: Duration,
    ) -> ExtractResult<String> {
        let request = self
            .client
            .get(url)
            .headers(Self::identity_headers(identity))
            .timeout(timeout);

        self.send_checked(request, url)
            .await?
            .text()
            .await
            .map_err(|e| Self::map_error(url, e))
    }

    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
        identity: &Identity,
        timeout: Duration,
    ) -> ExtractResult<serde_json::Value> {
        let request = self
            .client
            .post(url)
            .headers(Self::identity_headers(identity))
            .json(body)
            .timeout(timeout);

        self.send_checked(request, url)
            .await?
            .json()
            .await
            .map_err(|e| Self::map_error(url, e))
    }

    fn name(&self) -> &str {
        "reqwest"
    }
}
