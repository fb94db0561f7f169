//! Canonical data model shared by the extraction engine and its callers.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The five supported competitive-programming platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformId {
    LeetCode,
    Codeforces,
    CodeChef,
    HackerRank,
    GeeksForGeeks,
}

impl PlatformId {
    pub const ALL: [PlatformId; 5] = [
        PlatformId::LeetCode,
        PlatformId::Codeforces,
        PlatformId::CodeChef,
        PlatformId::HackerRank,
        PlatformId::GeeksForGeeks,
    ];

    /// Stable lowercase identifier, also used as the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformId::LeetCode => "leetcode",
            PlatformId::Codeforces => "codeforces",
            PlatformId::CodeChef => "codechef",
            PlatformId::HackerRank => "hackerrank",
            PlatformId::GeeksForGeeks => "geeksforgeeks",
        }
    }

    /// Public profile URL for a username on this platform.
    pub fn profile_url(&self, username: &str) -> String {
        match self {
            PlatformId::LeetCode => format!("https://leetcode.com/u/{username}/"),
            PlatformId::Codeforces => format!("https://codeforces.com/profile/{username}"),
            PlatformId::CodeChef => format!("https://www.codechef.com/users/{username}"),
            PlatformId::HackerRank => format!("https://www.hackerrank.com/profile/{username}"),
            PlatformId::GeeksForGeeks => {
                format!("https://www.geeksforgeeks.org/user/{username}/")
            }
        }
    }
}

impl fmt::Display for PlatformId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single canonical metric value. Counts stay numeric; rank-style fields
/// that are legitimately non-numeric ("N/A") are preserved as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Count(u64),
    Text(String),
}

impl MetricValue {
    pub fn as_count(&self) -> Option<u64> {
        match self {
            MetricValue::Count(n) => Some(*n),
            MetricValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            MetricValue::Text(s) => Some(s),
            MetricValue::Count(_) => None,
        }
    }
}

/// Raw fields produced by one extraction strategy, keyed by canonical field
/// name. Ordered map so downstream output is deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFields {
    values: BTreeMap<String, MetricValue>,
}

impl RawFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_count(&mut self, name: &str, value: u64) {
        self.values.insert(name.to_string(), MetricValue::Count(value));
    }

    pub fn set_text(&mut self, name: &str, value: impl Into<String>) {
        self.values
            .insert(name.to_string(), MetricValue::Text(value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&MetricValue> {
        self.values.get(name)
    }

    pub fn count(&self, name: &str) -> Option<u64> {
        self.values.get(name).and_then(MetricValue::as_count)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &MetricValue)> {
        self.values.iter()
    }
}

/// Canonical extraction output for one platform. Constructed once per
/// extraction call and immutable afterwards; persistence is the caller's
/// concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformResult {
    pub platform: PlatformId,
    pub username: String,
    pub profile_url: String,
    /// Always present; zero-filled when every strategy failed.
    pub metrics: BTreeMap<String, MetricValue>,
    /// Which strategy produced the metrics ("none" on total failure).
    pub source_strategy: String,
    /// Set if and only if no strategy satisfied its validity predicate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PlatformResult {
    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&PlatformId::GeeksForGeeks).unwrap();
        assert_eq!(json, "\"geeksforgeeks\"");
        let back: PlatformId = serde_json::from_str("\"leetcode\"").unwrap();
        assert_eq!(back, PlatformId::LeetCode);
    }

    #[test]
    fn metric_value_serializes_untagged() {
        assert_eq!(
            serde_json::to_string(&MetricValue::Count(17)).unwrap(),
            "17"
        );
        assert_eq!(
            serde_json::to_string(&MetricValue::Text("N/A".into())).unwrap(),
            "\"N/A\""
        );
    }

    #[test]
    fn profile_urls_embed_username() {
        for platform in PlatformId::ALL {
            let url = platform.profile_url("alice");
            assert!(url.contains("alice"), "{url}");
            assert!(url.starts_with("https://"));
        }
    }
}
