//! Result normalization: raw strategy fields → canonical platform shape.

use std::collections::BTreeMap;

use tracing::{info, warn};

use statline_core::{ExtractResult, MetricValue, PlatformId, PlatformResult};

use crate::cascade::CascadeOutcome;
use crate::platforms::schema;

/// Diagnostic attached to every total-failure result.
pub const FETCH_FAILED: &str = "Unable to fetch data";

/// Source tag used when no strategy succeeded.
const SOURCE_NONE: &str = "none";

/// Build the canonical `PlatformResult` for a cascade outcome.
///
/// Success maps raw fields onto the platform schema (counts stay numeric,
/// textual fields are coerced to text, missing fields keep their zero fill).
/// Failure yields the zero-filled schema plus the diagnostic. Deterministic:
/// identical inputs produce identical output, byte-for-byte once serialized.
pub fn normalize(
    platform: PlatformId,
    username: &str,
    outcome: ExtractResult<CascadeOutcome>,
) -> PlatformResult {
    let mut metrics = zero_metrics(platform);

    let (source_strategy, error) = match outcome {
        Ok(CascadeOutcome { fields, source }) => {
            for field in schema(platform) {
                let Some(value) = fields.get(field.name) else {
                    continue;
                };
                let value = if field.textual {
                    as_text(value)
                } else {
                    value.clone()
                };
                metrics.insert(field.name.to_string(), value);
            }
            derive_totals(platform, &mut metrics);
            info!(
                platform = %platform,
                username,
                source,
                "Normalized platform statistics"
            );
            (source.to_string(), None)
        }
        Err(e) => {
            warn!(
                platform = %platform,
                username,
                error = %e,
                "Extraction failed, returning zero-filled result"
            );
            (SOURCE_NONE.to_string(), Some(FETCH_FAILED.to_string()))
        }
    };

    PlatformResult {
        platform,
        username: username.to_string(),
        profile_url: platform.profile_url(username),
        metrics,
        source_strategy,
        error,
    }
}

/// Canonical schema with counts at 0 and textual fields at "N/A".
fn zero_metrics(platform: PlatformId) -> BTreeMap<String, MetricValue> {
    schema(platform)
        .iter()
        .map(|field| {
            let zero = if field.textual {
                MetricValue::Text("N/A".to_string())
            } else {
                MetricValue::Count(0)
            };
            (field.name.to_string(), zero)
        })
        .collect()
}

fn as_text(value: &MetricValue) -> MetricValue {
    match value {
        MetricValue::Count(n) => MetricValue::Text(n.to_string()),
        MetricValue::Text(s) => MetricValue::Text(s.clone()),
    }
}

/// For the difficulty-tiered judge, a strategy may deliver tier counts
/// without a total; the total is the tier sum in that case.
fn derive_totals(platform: PlatformId, metrics: &mut BTreeMap<String, MetricValue>) {
    if platform != PlatformId::LeetCode {
        return;
    }
    let total = metrics
        .get("problemsSolved")
        .and_then(MetricValue::as_count)
        .unwrap_or(0);
    if total > 0 {
        return;
    }
    let tier_sum: u64 = ["easySolved", "mediumSolved", "hardSolved"]
        .iter()
        .filter_map(|name| metrics.get(*name).and_then(MetricValue::as_count))
        .sum();
    if tier_sum > 0 {
        metrics.insert("problemsSolved".to_string(), MetricValue::Count(tier_sum));
    }
}
