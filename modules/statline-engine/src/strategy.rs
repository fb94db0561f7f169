//! Extraction strategies.
//!
//! A strategy is a pure recipe `(username, identity) -> RawFields | failure`
//! expressed as declarative tables (selector lists, regex lists, text
//! markers) plus fn pointers for the structured-query variants. The tables
//! are ordered by priority: within a field, the first selector/pattern that
//! yields a parseable, plausible value wins.

use std::time::Duration;

use regex::Regex;
use tracing::debug;

use statline_core::{dom, num, ExtractError, ExtractResult, HttpTransport, IdentityPool, RawFields};

/// Builds the request URL for a username.
pub type UrlFn = fn(&str) -> String;
/// Builds a JSON request body for a username.
pub type BodyFn = fn(&str) -> serde_json::Value;
/// Maps a structured-query JSON response into raw fields.
pub type ParseFn = fn(&serde_json::Value) -> ExtractResult<RawFields>;

/// How a structured query hits its endpoint.
pub enum StructuredRequest {
    GetJson,
    PostJson(BodyFn),
}

/// How a selector field interprets its matches.
pub enum FieldKind {
    /// Parse a number out of the matched element's text; reject values
    /// above `max` as selector false-positives.
    Count { max: u64 },
    /// Count the matching elements themselves (badge tiles, star icons).
    Tally { max: u64 },
    /// Keep the matched text verbatim (ranks may legitimately be "N/A").
    Label,
}

/// One canonical field extracted via a prioritized CSS selector list.
pub struct SelectorField {
    pub name: &'static str,
    pub selectors: &'static [&'static str],
    pub kind: FieldKind,
}

/// One canonical field extracted via prioritized regexes over inline
/// `<script>` bodies. Every pattern must have a single capture group.
pub struct PatternField {
    pub name: &'static str,
    pub patterns: &'static [&'static str],
    pub max: u64,
}

/// One canonical field recovered by scanning visible text for a literal
/// marker with a numeric token nearby.
pub struct TextMarker {
    pub name: &'static str,
    pub markers: &'static [&'static str],
    pub max: u64,
}

/// How many visible text nodes after a marker node are searched for the
/// adjacent numeric token. Kept tight: the wider the window, the likelier an
/// unrelated number is picked up.
const TEXT_SCAN_WINDOW: usize = 3;

/// A single extraction strategy for one platform.
pub enum ExtractionStrategy {
    /// Query the platform's own internal API (GraphQL or REST).
    StructuredQuery {
        endpoint: UrlFn,
        request: StructuredRequest,
        parse: ParseFn,
    },
    /// Query known-good CSS selectors over the profile page.
    HtmlSelectors {
        page: UrlFn,
        fields: &'static [SelectorField],
    },
    /// Scan inline script payloads for key/value patterns.
    ScriptPatterns {
        page: UrlFn,
        fields: &'static [PatternField],
    },
    /// Last resort: scan visible text for literal markers.
    TextScan {
        page: UrlFn,
        markers: &'static [TextMarker],
    },
}

impl ExtractionStrategy {
    /// Diagnostic tag recorded on the result when this strategy wins.
    pub fn label(&self) -> &'static str {
        match self {
            ExtractionStrategy::StructuredQuery { .. } => "api",
            ExtractionStrategy::HtmlSelectors { .. } => "selectors",
            ExtractionStrategy::ScriptPatterns { .. } => "script",
            ExtractionStrategy::TextScan { .. } => "text-scan",
        }
    }

    /// Run one attempt. Picks a fresh identity, performs exactly one fetch,
    /// and extracts fields synchronously from the response.
    pub async fn run(
        &self,
        username: &str,
        transport: &dyn HttpTransport,
        timeout: Duration,
    ) -> ExtractResult<RawFields> {
        let identity = IdentityPool::pick();

        match self {
            ExtractionStrategy::StructuredQuery {
                endpoint,
                request,
                parse,
            } => {
                let url = endpoint(username);
                let json = match request {
                    StructuredRequest::GetJson => {
                        transport.get_json(&url, identity, timeout).await?
                    }
                    StructuredRequest::PostJson(body) => {
                        transport
                            .post_json(&url, &body(username), identity, timeout)
                            .await?
                    }
                };
                parse(&json)
            }
            ExtractionStrategy::HtmlSelectors { page, fields } => {
                let html = transport.get(&page(username), identity, timeout).await?;
                let raw = extract_selector_fields(&html, fields);
                if raw.is_empty() {
                    Err(ExtractError::Structure(
                        "no selector matched a plausible value".into(),
                    ))
                } else {
                    Ok(raw)
                }
            }
            ExtractionStrategy::ScriptPatterns { page, fields } => {
                let html = transport.get(&page(username), identity, timeout).await?;
                let scripts = dom::inline_scripts(&html);
                let raw = extract_pattern_fields(&scripts, fields);
                if raw.is_empty() {
                    Err(ExtractError::Structure(
                        "no script pattern matched".into(),
                    ))
                } else {
                    Ok(raw)
                }
            }
            ExtractionStrategy::TextScan { page, markers } => {
                let html = transport.get(&page(username), identity, timeout).await?;
                let nodes = dom::visible_text(&html);
                let raw = extract_marker_fields(&nodes, markers);
                if raw.is_empty() {
                    Err(ExtractError::Structure(
                        "no text marker with adjacent number".into(),
                    ))
                } else {
                    Ok(raw)
                }
            }
        }
    }
}

fn extract_selector_fields(html: &str, fields: &[SelectorField]) -> RawFields {
    let mut raw = RawFields::new();

    for field in fields {
        for selector in field.selectors {
            match field.kind {
                FieldKind::Count { max } => {
                    let Some(text) = dom::select_first_text(html, selector) else {
                        continue;
                    };
                    if let Some(count) = num::bounded_count(&text, max) {
                        raw.set_count(field.name, count);
                        break;
                    }
                    debug!(field = field.name, selector, text, "Match not a plausible count");
                }
                FieldKind::Tally { max } => {
                    let count = dom::select_count(html, selector) as u64;
                    if count > 0 && count <= max {
                        raw.set_count(field.name, count);
                        break;
                    }
                }
                FieldKind::Label => {
                    if let Some(text) = dom::select_first_text(html, selector) {
                        raw.set_text(field.name, text);
                        break;
                    }
                }
            }
        }
    }

    raw
}

fn extract_pattern_fields(scripts: &[String], fields: &[PatternField]) -> RawFields {
    let mut raw = RawFields::new();

    for field in fields {
        'patterns: for pattern in field.patterns {
            let re = Regex::new(pattern).expect("valid regex");
            for script in scripts {
                let Some(captures) = re.captures(script) else {
                    continue;
                };
                let Some(token) = captures.get(1) else {
                    continue;
                };
                if let Some(count) = num::bounded_count(token.as_str(), field.max) {
                    raw.set_count(field.name, count);
                    break 'patterns;
                }
            }
        }
    }

    raw
}

fn extract_marker_fields(nodes: &[String], markers: &[TextMarker]) -> RawFields {
    let mut raw = RawFields::new();

    for marker_field in markers {
        'markers: for marker in marker_field.markers {
            let marker_lower = marker.to_lowercase();
            for (idx, node) in nodes.iter().enumerate() {
                let node_lower = node.to_lowercase();
                let Some(pos) = node_lower.find(&marker_lower) else {
                    continue;
                };

                // Prefer a number in the same node, after the marker text.
                // Indexing via `get`: lowercasing can shift byte offsets on
                // non-ASCII text, so an unaligned slice is treated as a miss.
                if let Some(after) = node.get(pos + marker.len()..) {
                    if let Some(count) = num::bounded_count(after, marker_field.max) {
                        raw.set_count(marker_field.name, count);
                        break 'markers;
                    }
                }

                // Otherwise look a few nodes ahead, no further.
                for next in nodes.iter().skip(idx + 1).take(TEXT_SCAN_WINDOW) {
                    if let Some(count) = num::bounded_count(next, marker_field.max) {
                        raw.set_count(marker_field.name, count);
                        break 'markers;
                    }
                }
            }
        }
    }

    raw
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_priority_first_plausible_wins() {
        let html = r#"
            <div class="stale">999999999</div>
            <div class="fresh">1,234</div>
        "#;
        let fields = [SelectorField {
            name: "problemsSolved",
            selectors: &[".missing", ".stale", ".fresh"],
            kind: FieldKind::Count { max: 100_000 },
        }];

        let raw = extract_selector_fields(html, &fields);
        // .stale matches but fails the range guard; .fresh wins
        assert_eq!(raw.count("problemsSolved"), Some(1234));
    }

    #[test]
    fn tally_counts_elements() {
        let html = r#"<span class="badge"></span><span class="badge"></span>"#;
        let fields = [SelectorField {
            name: "badges",
            selectors: &[".badge"],
            kind: FieldKind::Tally { max: 100 },
        }];

        let raw = extract_selector_fields(html, &fields);
        assert_eq!(raw.count("badges"), Some(2));
    }

    #[test]
    fn label_preserves_text_verbatim() {
        let html = r#"<span class="rank">N/A</span>"#;
        let fields = [SelectorField {
            name: "rank",
            selectors: &[".rank"],
            kind: FieldKind::Label,
        }];

        let raw = extract_selector_fields(html, &fields);
        assert_eq!(raw.get("rank").unwrap().as_text(), Some("N/A"));
    }

    #[test]
    fn pattern_fields_scan_all_scripts_in_priority_order() {
        let scripts = vec![
            "var theme = 'dark';".to_string(),
            r#"window.__data = {"solvedProblem":321,"rating":1503};"#.to_string(),
        ];
        let fields = [
            PatternField {
                name: "problemsSolved",
                patterns: &[r#""acSubmissionNum":(\d+)"#, r#""solvedProblem":(\d+)"#],
                max: 100_000,
            },
            PatternField {
                name: "currentRating",
                patterns: &[r#""rating":(\d+)"#],
                max: 5_000,
            },
        ];

        let raw = extract_pattern_fields(&scripts, &fields);
        assert_eq!(raw.count("problemsSolved"), Some(321));
        assert_eq!(raw.count("currentRating"), Some(1503));
    }

    #[test]
    fn text_scan_finds_number_in_same_node_or_window() {
        let nodes: Vec<String> = ["Profile", "Problems Solved", "567", "Rank", "12"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let markers = [TextMarker {
            name: "problemsSolved",
            markers: &["problems solved"],
            max: 100_000,
        }];

        let raw = extract_marker_fields(&nodes, &markers);
        assert_eq!(raw.count("problemsSolved"), Some(567));
    }

    #[test]
    fn text_scan_range_guard_rejects_implausible_numbers() {
        let nodes: Vec<String> = ["Problems Solved", "9999999999"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let markers = [TextMarker {
            name: "problemsSolved",
            markers: &["problems solved"],
            max: 100_000,
        }];

        let raw = extract_marker_fields(&nodes, &markers);
        assert!(raw.is_empty());
    }

    #[test]
    fn text_scan_window_is_bounded() {
        // Number sits five nodes after the marker, outside the window.
        let nodes: Vec<String> = ["Problems Solved", "a", "b", "c", "d", "42"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let markers = [TextMarker {
            name: "problemsSolved",
            markers: &["problems solved"],
            max: 100_000,
        }];

        let raw = extract_marker_fields(&nodes, &markers);
        assert!(raw.is_empty());
    }
}
