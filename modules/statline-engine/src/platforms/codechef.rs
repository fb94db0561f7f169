//! CodeChef: rating-based judge. No usable public API; the profile page is
//! server-rendered, so selectors lead the cascade.

use statline_core::RawFields;

use crate::cascade::CascadeStep;
use crate::platforms::any_positive;
use crate::strategy::{
    ExtractionStrategy, FieldKind, PatternField, SelectorField, TextMarker,
};

const MAX_PROBLEMS: u64 = 100_000;
const MAX_RATING: u64 = 5_000;

fn profile_page(username: &str) -> String {
    format!("https://www.codechef.com/users/{username}")
}

static SELECTOR_FIELDS: &[SelectorField] = &[
    SelectorField {
        name: "currentRating",
        selectors: &[".rating-number", ".rating-header .rating"],
        kind: FieldKind::Count { max: MAX_RATING },
    },
    SelectorField {
        name: "problemsSolved",
        // The sidebar renders "Total Problems Solved: 123" inside an h3.
        selectors: &[
            "section.problems-solved h3",
            ".problems-solved h3",
            ".rating-data-section.problems-solved h3",
        ],
        kind: FieldKind::Count { max: MAX_PROBLEMS },
    },
];

static SCRIPT_FIELDS: &[PatternField] = &[
    PatternField {
        name: "currentRating",
        patterns: &[r#""currentRating":(\d+)"#, r#""rating":(\d{3,4})"#],
        max: MAX_RATING,
    },
    PatternField {
        name: "problemsSolved",
        patterns: &[r#""problemsSolved":"?(\d+)"#, r#""total_solved":(\d+)"#],
        max: MAX_PROBLEMS,
    },
];

static TEXT_MARKERS: &[TextMarker] = &[
    TextMarker {
        name: "problemsSolved",
        markers: &["total problems solved"],
        max: MAX_PROBLEMS,
    },
    TextMarker {
        name: "currentRating",
        markers: &["rating"],
        max: MAX_RATING,
    },
];

fn rating_valid(fields: &RawFields) -> bool {
    any_positive(fields, &["currentRating", "problemsSolved"])
}

pub(super) fn steps() -> Vec<CascadeStep> {
    vec![
        CascadeStep {
            strategy: ExtractionStrategy::HtmlSelectors {
                page: profile_page,
                fields: SELECTOR_FIELDS,
            },
            accept: rating_valid,
        },
        CascadeStep {
            strategy: ExtractionStrategy::ScriptPatterns {
                page: profile_page,
                fields: SCRIPT_FIELDS,
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
