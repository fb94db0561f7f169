//! Fan-out orchestration: one isolated task per requested platform.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tracing::{info, warn};

use statline_core::{ExtractError, HttpTransport, PlatformId, PlatformResult};

use crate::normalize::normalize;
use crate::platforms::PlatformAdapter;

/// Runs platform extractions concurrently and gathers the canonical results.
///
/// Cloneable-by-Arc transport is the only shared state; everything else is
/// per-task. `fetch_all` is a join over independent tasks, not a race: it
/// returns once every dispatched platform has a result. Tasks are bounded
/// (strategies × per-attempt timeout), so callers needing batch-level
/// cancellation can simply wrap the call in `tokio::time::timeout`.
pub struct StatAggregator {
    transport: Arc<dyn HttpTransport>,
    timeout: Option<Duration>,
}

impl StatAggregator {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            timeout: None,
        }
    }

    /// Override every platform's per-attempt strategy timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn adapter(&self, platform: PlatformId) -> PlatformAdapter {
        let adapter = PlatformAdapter::new(platform);
        match self.timeout {
            Some(timeout) => adapter.with_timeout(timeout),
            None => adapter,
        }
    }

    /// Extract a single platform. Never errors; failures come back as
    /// zero-metric results.
    pub async fn fetch(&self, platform: PlatformId, username: &str) -> PlatformResult {
        self.adapter(platform)
            .extract(username, self.transport.as_ref())
            .await
    }

    /// Extract all requested platforms concurrently. Entries with an empty
    /// or whitespace username are omitted from the result map entirely.
    /// A panic in one platform's task is contained: that platform reports a
    /// normalized failure and the rest of the batch is unaffected.
    pub async fn fetch_all(
        &self,
        queries: &HashMap<PlatformId, String>,
    ) -> HashMap<PlatformId, PlatformResult> {
        let mut tasks = Vec::new();

        for (&platform, username) in queries {
            let username = username.trim().to_string();
            if username.is_empty() {
                continue;
            }

            let adapter = self.adapter(platform);
            let transport = Arc::clone(&self.transport);
            let task_username = username.clone();
            let handle = tokio::spawn(async move {
                adapter
                    .extract(&task_username, transport.as_ref())
                    .await
            });
            tasks.push((platform, username, handle));
        }

        let dispatched = tasks.len();
        let joined = join_all(
            tasks
                .into_iter()
                .map(|(platform, username, handle)| async move {
                    (platform, username, handle.await)
                }),
        )
        .await;

        let mut results = HashMap::with_capacity(dispatched);
        for (platform, username, joined_result) in joined {
            let result = match joined_result {
                Ok(result) => result,
                Err(e) => {
                    warn!(
                        platform = %platform,
                        username,
                        error = %e,
                        "Platform extraction task aborted"
                    );
                    normalize(platform, &username, Err(ExtractError::Exhausted))
                }
            };
            results.insert(platform, result);
        }

        info!(
            requested = queries.len(),
            dispatched,
            failed = results.values().filter(|r| r.is_failure()).count(),
            "Profile extraction batch complete"
        );
        results
    }
}
