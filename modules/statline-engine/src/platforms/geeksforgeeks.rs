//! GeeksforGeeks. The profile is a Next.js app: hashed CSS-module class
//! names for the score cards, with the full stats mirrored in the
//! `__NEXT_DATA__` script payload, which makes the script strategy a strong
//! second rung when the class hashes rotate.

use statline_core::RawFields;

use crate::cascade::CascadeStep;
use crate::platforms::any_positive;
use crate::strategy::{
    ExtractionStrategy, FieldKind, PatternField, SelectorField, TextMarker,
};

const MAX_PROBLEMS: u64 = 100_000;
const MAX_SCORE: u64 = 100_000;

fn profile_page(username: &str) -> String {
    format!("https://www.geeksforgeeks.org/user/{username}/")
}

static SELECTOR_FIELDS: &[SelectorField] = &[
    SelectorField {
        name: "codingScore",
        // First score card is the coding score.
        selectors: &[
            ".scoreCard_head_left--score__oSi_x",
            ".score_card_value",
        ],
        kind: FieldKind::Count { max: MAX_SCORE },
    },
    SelectorField {
        name: "problemsSolved",
        selectors: &[
            ".scoreCards div:nth-child(2) .scoreCard_head_left--score__oSi_x",
            ".problemNavbar_head_nav--text__UaGCx",
        ],
        kind: FieldKind::Count { max: MAX_PROBLEMS },
    },
    SelectorField {
        name: "rank",
        selectors: &[
            ".educationDetails_head_left_userRankContainer--text__wt81s b",
            ".rankNum",
        ],
        kind: FieldKind::Label,
    },
];

static SCRIPT_FIELDS: &[PatternField] = &[
    PatternField {
        name: "problemsSolved",
        patterns: &[
            r#""total_problems_solved":(\d+)"#,
            r#""totalProblemsSolved":(\d+)"#,
        ],
        max: MAX_PROBLEMS,
    },
    PatternField {
        name: "codingScore",
        patterns: &[r#""score":(\d+)"#, r#""coding_score":(\d+)"#],
        max: MAX_SCORE,
    },
];

static TEXT_MARKERS: &[TextMarker] = &[
    TextMarker {
        name: "problemsSolved",
        markers: &["problem solved", "problems solved"],
        max: MAX_PROBLEMS,
    },
    TextMarker {
        name: "codingScore",
        markers: &["coding score"],
        max: MAX_SCORE,
    },
];

fn gfg_valid(fields: &RawFields) -> bool {
    any_positive(fields, &["problemsSolved", "codingScore"])
}

pub(super) fn steps() -> Vec<CascadeStep> {
    vec![
        CascadeStep {
            strategy: ExtractionStrategy::HtmlSelectors {
                page: profile_page,
                fields: SELECTOR_FIELDS,
            },
            accept: gfg_valid,
        },
        CascadeStep {
            strategy: ExtractionStrategy::ScriptPatterns {
                page: profile_page,
                fields: SCRIPT_FIELDS,
            },
            accept: gfg_valid,
        },
        CascadeStep {
            strategy: ExtractionStrategy::TextScan {
                page: profile_page,
                markers: TEXT_MARKERS,
            },
            accept: gfg_valid,
        },
    ]
}
