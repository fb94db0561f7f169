//! LeetCode: difficulty-tiered judge.
//!
//! The internal GraphQL endpoint is by far the most reliable source; the
//! rendered profile is a React app whose class names churn constantly, so
//! the selector and script fallbacks carry generous alternatives.

use serde_json::{json, Value};

use statline_core::{ExtractError, ExtractResult, RawFields};

use crate::cascade::CascadeStep;
use crate::platforms::any_positive;
use crate::strategy::{
    ExtractionStrategy, FieldKind, PatternField, SelectorField, StructuredRequest, TextMarker,
};

const MAX_PROBLEMS: u64 = 100_000;
const MAX_RANK: u64 = 10_000_000;

const PROFILE_QUERY: &str = "\
query userProfile($username: String!) {\
  matchedUser(username: $username) {\
    profile { ranking }\
    submitStatsGlobal { acSubmissionNum { difficulty count } }\
  }\
}";

fn graphql_endpoint(_username: &str) -> String {
    "https://leetcode.com/graphql".to_string()
}

fn profile_page(username: &str) -> String {
    format!("https://leetcode.com/u/{username}/")
}

fn graphql_body(username: &str) -> Value {
    json!({
        "query": PROFILE_QUERY,
        "variables": { "username": username },
    })
}

fn parse_graphql(response: &Value) -> ExtractResult<RawFields> {
    let user = response
        .pointer("/data/matchedUser")
        .filter(|v| !v.is_null())
        .ok_or_else(|| ExtractError::Structure("matchedUser missing from GraphQL response".into()))?;

    let mut fields = RawFields::new();

    if let Some(buckets) = user
        .pointer("/submitStatsGlobal/acSubmissionNum")
        .and_then(Value::as_array)
    {
        for bucket in buckets {
            let Some(count) = bucket.get("count").and_then(Value::as_u64) else {
                continue;
            };
            match bucket.get("difficulty").and_then(Value::as_str) {
                Some("All") => fields.set_count("problemsSolved", count),
                Some("Easy") => fields.set_count("easySolved", count),
                Some("Medium") => fields.set_count("mediumSolved", count),
                Some("Hard") => fields.set_count("hardSolved", count),
                _ => {}
            }
        }
    }

    if let Some(ranking) = user.pointer("/profile/ranking").and_then(Value::as_u64) {
        fields.set_count("rank", ranking);
    }

    if fields.is_empty() {
        return Err(ExtractError::Structure(
            "GraphQL response carried no submission stats".into(),
        ));
    }
    Ok(fields)
}

static SELECTOR_FIELDS: &[SelectorField] = &[
    SelectorField {
        name: "problemsSolved",
        selectors: &[
            "div[class*='total-solved'] span",
            "div[class*='solved'] span[class*='count']",
        ],
        kind: FieldKind::Count { max: MAX_PROBLEMS },
    },
    SelectorField {
        name: "easySolved",
        selectors: &[
            "div[class*='difficulty-easy'] span",
            "div[class*='easy'] span[class*='count']",
        ],
        kind: FieldKind::Count { max: MAX_PROBLEMS },
    },
    SelectorField {
        name: "mediumSolved",
        selectors: &[
            "div[class*='difficulty-medium'] span",
            "div[class*='medium'] span[class*='count']",
        ],
        kind: FieldKind::Count { max: MAX_PROBLEMS },
    },
    SelectorField {
        name: "hardSolved",
        selectors: &[
            "div[class*='difficulty-hard'] span",
            "div[class*='hard'] span[class*='count']",
        ],
        kind: FieldKind::Count { max: MAX_PROBLEMS },
    },
    SelectorField {
        name: "rank",
        selectors: &["span[class*='ranking-number']", "div[class*='ranking'] span"],
        kind: FieldKind::Label,
    },
];

static SCRIPT_FIELDS: &[PatternField] = &[
    PatternField {
        name: "problemsSolved",
        patterns: &[
            r#""acSubmissionNum":\[\{"difficulty":"All","count":(\d+)"#,
            r#""solvedProblem":(\d+)"#,
        ],
        max: MAX_PROBLEMS,
    },
    PatternField {
        name: "easySolved",
        patterns: &[r#""difficulty":"Easy","count":(\d+)"#, r#""easySolved":(\d+)"#],
        max: MAX_PROBLEMS,
    },
    PatternField {
        name: "mediumSolved",
        patterns: &[r#""difficulty":"Medium","count":(\d+)"#, r#""mediumSolved":(\d+)"#],
        max: MAX_PROBLEMS,
    },
    PatternField {
        name: "hardSolved",
        patterns: &[r#""difficulty":"Hard","count":(\d+)"#, r#""hardSolved":(\d+)"#],
        max: MAX_PROBLEMS,
    },
    PatternField {
        name: "rank",
        patterns: &[r#""ranking":(\d+)"#],
        max: MAX_RANK,
    },
];

static TEXT_MARKERS: &[TextMarker] = &[TextMarker {
    name: "problemsSolved",
    markers: &["problems solved", "solved"],
    max: MAX_PROBLEMS,
}];

fn tiered_valid(fields: &RawFields) -> bool {
    any_positive(
        fields,
        &["problemsSolved", "easySolved", "mediumSolved", "hardSolved"],
    )
}

pub(super) fn steps() -> Vec<CascadeStep> {
    vec![
        CascadeStep {
            strategy: ExtractionStrategy::StructuredQuery {
                endpoint: graphql_endpoint,
                request: StructuredRequest::PostJson(graphql_body),
                parse: parse_graphql,
            },
            accept: tiered_valid,
        },
        CascadeStep {
            strategy: ExtractionStrategy::HtmlSelectors {
                page: profile_page,
                fields: SELECTOR_FIELDS,
            },
            accept: tiered_valid,
        },
        CascadeStep {
            strategy: ExtractionStrategy::ScriptPatterns {
                page: profile_page,
                fields: SCRIPT_FIELDS,
            },
            accept: tiered_valid,
        },
        CascadeStep {
            strategy: ExtractionStrategy::TextScan {
                page: profile_page,
                markers: TEXT_MARKERS,
            },
            accept: tiered_valid,
        },
    ]
}
