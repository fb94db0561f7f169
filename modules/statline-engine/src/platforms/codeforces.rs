//! Codeforces: rating-based judge.
//!
//! `user.info` is a real documented-ish API but carries no solved count, so
//! an API win yields rating only; the selector fallback on the profile page
//! recovers both fields when the API path is down.

use serde_json::Value;

use statline_core::{ExtractError, ExtractResult, RawFields};

use crate::cascade::CascadeStep;
use crate::platforms::any_positive;
use crate::strategy::{
    ExtractionStrategy, FieldKind, SelectorField, StructuredRequest, TextMarker,
};

const MAX_PROBLEMS: u64 = 100_000;
const MAX_RATING: u64 = 5_000;

fn api_endpoint(username: &str) -> String {
    format!("https://codeforces.com/api/user.info?handles={username}")
}

fn profile_page(username: &str) -> String {
    format!("https://codeforces.com/profile/{username}")
}

fn parse_user_info(response: &Value) -> ExtractResult<RawFields> {
    if response.get("status").and_then(Value::as_str) != Some("OK") {
        return Err(ExtractError::Structure(
            "user.info returned non-OK status".into(),
        ));
    }
    let user = response
        .pointer("/result/0")
        .ok_or_else(|| ExtractError::Structure("user.info result list empty".into()))?;

    let mut fields = RawFields::new();
    if let Some(rating) = user.get("rating").and_then(Value::as_u64) {
        fields.set_count("currentRating", rating);
    }

    if fields.is_empty() {
        // Unrated accounts have no rating key; let the page strategies try.
        return Err(ExtractError::Structure("user has no rating yet".into()));
    }
    Ok(fields)
}

static SELECTOR_FIELDS: &[SelectorField] = &[
    SelectorField {
        name: "currentRating",
        selectors: &[
            "div.info ul li span[class^='user-']",
            ".userbox .info li span",
        ],
        kind: FieldKind::Count { max: MAX_RATING },
    },
    SelectorField {
        name: "problemsSolved",
        selectors: &[
            "._UserActivityFrame_counterValue",
            ".userActivity .counterValue",
        ],
        kind: FieldKind::Count { max: MAX_PROBLEMS },
    },
];

static TEXT_MARKERS: &[TextMarker] = &[
    TextMarker {
        name: "problemsSolved",
        markers: &["problems solved", "problem solved"],
        max: MAX_PROBLEMS,
    },
    TextMarker {
        name: "currentRating",
        markers: &["contest rating"],
        max: MAX_RATING,
    },
];

fn rating_valid(fields: &RawFields) -> bool {
    any_positive(fields, &["currentRating", "problemsSolved"])
}

pub(super) fn steps() -> Vec<CascadeStep> {
    vec![
        CascadeStep {
            strategy: ExtractionStrategy::StructuredQuery {
                endpoint: api_endpoint,
                request: StructuredRequest::GetJson,
                parse: parse_user_info,
            },
            accept: rating_valid,
        },
        CascadeStep {
            strategy: ExtractionStrategy::HtmlSelectors {
                page: profile_page,
                fields: SELECTOR_FIELDS,
            },
            accept: rating_valid,
        },
        CascadeStep {
            strategy: ExtractionStrategy::TextScan {
                page: profile_page,
                markers: TEXT_MARKERS,
            },
            accept: rating_valid,
        },
    ]
}
