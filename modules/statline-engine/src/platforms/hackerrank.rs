//! HackerRank: badge-based judge. The REST badges endpoint returns one model
//! per badge track with its star level and solved count.

use serde_json::Value;

use statline_core::{ExtractError, ExtractResult, RawFields};

use crate::cascade::CascadeStep;
use crate::platforms::any_positive;
use crate::strategy::{
    ExtractionStrategy, FieldKind, SelectorField, StructuredRequest, TextMarker,
};

const MAX_PROBLEMS: u64 = 100_000;
const MAX_BADGES: u64 = 100;
const MAX_STARS: u64 = 1_000;

fn badges_endpoint(username: &str) -> String {
    format!("https://www.hackerrank.com/rest/hackers/{username}/badges")
}

fn profile_page(username: &str) -> String {
    format!("https://www.hackerrank.com/profile/{username}")
}

fn parse_badges(response: &Value) -> ExtractResult<RawFields> {
    let models = response
        .get("models")
        .and_then(Value::as_array)
        .ok_or_else(|| ExtractError::Structure("badges response has no models array".into()))?;

    let mut badges = 0u64;
    let mut stars = 0u64;
    let mut solved = 0u64;
    for model in models {
        badges += 1;
        stars += model.get("stars").and_then(Value::as_u64).unwrap_or(0);
        solved += model.get("solved").and_then(Value::as_u64).unwrap_or(0);
    }

    let mut fields = RawFields::new();
    fields.set_count("badges", badges);
    fields.set_count("totalStars", stars);
    fields.set_count("problemsSolved", solved);
    Ok(fields)
}

static SELECTOR_FIELDS: &[SelectorField] = &[
    SelectorField {
        name: "badges",
        selectors: &[".hacker-badge", ".badges-list .hacker-badge"],
        kind: FieldKind::Tally { max: MAX_BADGES },
    },
    SelectorField {
        name: "totalStars",
        selectors: &[".badge-star", ".star-section .badge-star"],
        kind: FieldKind::Tally { max: MAX_STARS },
    },
    SelectorField {
        name: "problemsSolved",
        selectors: &[".solved-challenges .value", ".profile-stat .value"],
        kind: FieldKind::Count { max: MAX_PROBLEMS },
    },
];

static TEXT_MARKERS: &[TextMarker] = &[
    TextMarker {
        name: "badges",
        markers: &["badges"],
        max: MAX_BADGES,
    },
    TextMarker {
        name: "problemsSolved",
        markers: &["challenges solved", "problems solved"],
        max: MAX_PROBLEMS,
    },
];

fn badge_valid(fields: &RawFields) -> bool {
    any_positive(fields, &["badges", "totalStars", "problemsSolved"])
}

pub(super) fn steps() -> Vec<CascadeStep> {
    vec![
        CascadeStep {
            strategy: ExtractionStrategy::StructuredQuery {
                endpoint: badges_endpoint,
                request: StructuredRequest::GetJson,
                parse: parse_badges,
            },
            accept: badge_valid,
        },
        CascadeStep {
            strategy: ExtractionStrategy::HtmlSelectors {
                page: profile_page,
                fields: SELECTOR_FIELDS,
            },
            accept: badge_valid,
        },
        CascadeStep {
            strategy: ExtractionStrategy::TextScan {
                page: profile_page,
                markers: TEXT_MARKERS,
            },
            accept: badge_valid,
        },
    ]
}
