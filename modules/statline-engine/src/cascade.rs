//! Ordered fallback execution of extraction strategies.

use std::time::Duration;

use tracing::{info, warn};

use statline_core::{ExtractError, ExtractResult, HttpTransport, PlatformId, RawFields};

use crate::strategy::ExtractionStrategy;

/// Accepts or rejects a strategy's output. Platform-specific: e.g. "at least
/// one of the solved counters is positive".
pub type ValidityFn = fn(&RawFields) -> bool;

/// One rung of a platform's cascade.
pub struct CascadeStep {
    pub strategy: ExtractionStrategy,
    pub accept: ValidityFn,
}

/// The fields and diagnostic tag of the winning strategy.
#[derive(Debug)]
pub struct CascadeOutcome {
    pub fields: RawFields,
    pub source: &'static str,
}

/// Run strategies strictly in order, each attempted once, stopping at the
/// first whose output passes its validity predicate. Remaining strategies are
/// skipped. Every attempt is independently bounded by `timeout`; a timed-out
/// or failed attempt is that strategy's failure, never a cascade abort.
pub async fn run_cascade(
    platform: PlatformId,
    username: &str,
    steps: &[CascadeStep],
    transport: &dyn HttpTransport,
    timeout: Duration,
) -> ExtractResult<CascadeOutcome> {
    for (idx, step) in steps.iter().enumerate() {
        let strategy = step.strategy.label();
        let step_no = idx + 1;

        let attempt = tokio::time::timeout(
            timeout,
            step.strategy.run(username, transport, timeout),
        )
        .await
        .unwrap_or_else(|_| {
            Err(ExtractError::Timeout {
                url: platform.profile_url(username),
            })
        });

        match attempt {
            Ok(fields) => {
                if (step.accept)(&fields) {
                    info!(
                        platform = %platform,
                        username,
                        strategy,
                        step = step_no,
                        "Extraction strategy succeeded"
                    );
                    return Ok(CascadeOutcome {
                        fields,
                        source: strategy,
                    });
                }
                let e = ExtractError::Validation(format!(
                    "{strategy} output failed the platform validity check"
                ));
                warn!(
                    platform = %platform,
                    username,
                    strategy,
                    step = step_no,
                    error = %e,
                    "Extracted fields rejected, falling through"
                );
            }
            Err(e) => {
                warn!(
                    platform = %platform,
                    username,
                    strategy,
                    step = step_no,
                    error = %e,
                    "Extraction strategy failed, falling through"
                );
            }
        }
    }

    Err(ExtractError::Exhausted)
}
