//! HTML query helpers over the `scraper` crate.
//!
//! All lookups are infallible: a selector that parses badly or matches
//! nothing is "no match" (`None` / empty), never a panic or error. Parsed
//! documents are created and dropped inside each call so callers in async
//! code never hold a non-`Send` DOM across an await point.

use scraper::{Html, Selector};

/// Trimmed text content of the first element matching `selector`.
pub fn select_first_text(html: &str, selector: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(selector).ok()?;
    let element = document.select(&selector).next()?;
    let text: String = element.text().collect::<Vec<_>>().join(" ");
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Number of elements matching `selector`. Invalid selectors count as zero.
pub fn select_count(html: &str, selector: &str) -> usize {
    let document = Html::parse_document(html);
    match Selector::parse(selector) {
        Ok(selector) => document.select(&selector).count(),
        Err(_) => 0,
    }
}

/// Bodies of every inline `<script>` element, in document order.
pub fn inline_scripts(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("script").expect("valid selector");
    document
        .select(&selector)
        .map(|el| el.text().collect::<Vec<_>>().join(""))
        .filter(|body| !body.trim().is_empty())
        .collect()
}

/// All visible text nodes in document order, trimmed, with script/style/
/// noscript content excluded. This feeds the last-resort text-scan strategy.
pub fn visible_text(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut nodes = Vec::new();

    for node in document.tree.nodes() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let trimmed = text.trim();
        if trimmed.is_empty() {
            continue;
        }

        let mut hidden = false;
        let mut current = node.parent();
        while let Some(parent) = current {
            if let Some(element) = parent.value().as_element() {
                if matches!(element.name(), "script" | "style" | "noscript") {
                    hidden = true;
                    break;
                }
            }
            current = parent.parent();
        }

        if !hidden {
            nodes.push(trimmed.to_string());
        }
    }

    nodes
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><head>
            <style>.rating { color: red; }</style>
            <script>window.__stats = {"solved": 321};</script>
        </head><body>
            <div class="rating-number">1,234</div>
            <section class="problems">
                <h3>Total Problems Solved: 567</h3>
            </section>
            <ul class="badges">
                <li class="badge">Gold</li>
                <li class="badge">Silver</li>
                <li class="badge">Bronze</li>
            </ul>
        </body></html>
    "#;

    #[test]
    fn select_first_text_returns_trimmed_match() {
        assert_eq!(
            select_first_text(PAGE, ".rating-number").as_deref(),
            Some("1,234")
        );
        assert_eq!(
            select_first_text(PAGE, "section.problems h3").as_deref(),
            Some("Total Problems Solved: 567")
        );
    }

    #[test]
    fn missing_or_invalid_selector_is_no_match() {
        assert_eq!(select_first_text(PAGE, ".does-not-exist"), None);
        assert_eq!(select_first_text(PAGE, ":::not a selector"), None);
        assert_eq!(select_count(PAGE, ":::not a selector"), 0);
    }

    #[test]
    fn select_count_tallies_elements() {
        assert_eq!(select_count(PAGE, "li.badge"), 3);
        assert_eq!(select_count(PAGE, "li.trophy"), 0);
    }

    #[test]
    fn inline_scripts_returns_bodies() {
        let scripts = inline_scripts(PAGE);
        assert_eq!(scripts.len(), 1);
        assert!(scripts[0].contains("\"solved\": 321"));
    }

    #[test]
    fn visible_text_excludes_script_and_style() {
        let nodes = visible_text(PAGE);
        assert!(nodes.iter().any(|n| n == "1,234"));
        assert!(nodes.iter().any(|n| n.contains("Total Problems Solved")));
        assert!(!nodes.iter().any(|n| n.contains("__stats")));
        assert!(!nodes.iter().any(|n| n.contains("color: red")));
    }
}
