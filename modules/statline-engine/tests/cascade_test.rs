//! Cascade behavior through a full platform adapter: short-circuit on the
//! first valid strategy, fallback across rungs, and graceful degradation
//! when every rung fails.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use statline_core::{MetricValue, PlatformId};
use statline_engine::testing::MockTransport;
use statline_engine::{StatAggregator, FETCH_FAILED};

fn aggregator(transport: Arc<MockTransport>) -> StatAggregator {
    StatAggregator::new(transport).with_timeout(Duration::from_secs(5))
}

#[tokio::test]
async fn first_valid_strategy_short_circuits_the_rest() {
    let transport = Arc::new(MockTransport::new().on_get(
        "https://codeforces.com/api/user.info?handles=tourist",
        r#"{ "status": "OK", "result": [{ "handle": "tourist", "rating": 3850 }] }"#,
    ));

    let result = aggregator(Arc::clone(&transport))
        .fetch(PlatformId::Codeforces, "tourist")
        .await;

    assert_eq!(result.source_strategy, "api");
    assert_eq!(
        result.metrics["currentRating"],
        MetricValue::Count(3850)
    );
    // The profile page was never touched.
    assert_eq!(transport.request_count(), 1);
    assert_eq!(transport.requests_matching("codeforces.com/profile"), 0);
}

#[tokio::test]
async fn api_failure_falls_back_to_selectors() {
    // No API registration, so the first rung fails with a transport error.
    let transport = Arc::new(MockTransport::new().on_get(
        "https://codeforces.com/profile/alice",
        r#"<div class="info"><ul><li>
               <span class="user-blue">1687</span>
           </li></ul></div>
           <div class="_UserActivityFrame_counterValue">293</div>"#,
    ));

    let result = aggregator(Arc::clone(&transport))
        .fetch(PlatformId::Codeforces, "alice")
        .await;

    assert_eq!(result.source_strategy, "selectors");
    assert_eq!(result.metrics["currentRating"], MetricValue::Count(1687));
    assert_eq!(result.metrics["problemsSolved"], MetricValue::Count(293));
    assert!(result.error.is_none());
    assert_eq!(transport.requests_matching("api/user.info"), 1);
}

#[tokio::test]
async fn graphql_success_yields_tiered_counts() {
    let transport = Arc::new(MockTransport::new().on_post(
        "https://leetcode.com/graphql",
        json!({
            "data": { "matchedUser": {
                "profile": { "ranking": 1500 },
                "submitStatsGlobal": { "acSubmissionNum": [
                    { "difficulty": "All", "count": 17 },
                    { "difficulty": "Easy", "count": 10 },
                    { "difficulty": "Medium", "count": 5 },
                    { "difficulty": "Hard", "count": 2 },
                ]},
            }},
        }),
    ));

    let result = aggregator(transport)
        .fetch(PlatformId::LeetCode, "alice")
        .await;

    assert_eq!(result.source_strategy, "api");
    assert_eq!(result.metrics["problemsSolved"], MetricValue::Count(17));
    assert_eq!(result.metrics["easySolved"], MetricValue::Count(10));
    assert_eq!(result.metrics["mediumSolved"], MetricValue::Count(5));
    assert_eq!(result.metrics["hardSolved"], MetricValue::Count(2));
    assert_eq!(result.metrics["rank"], MetricValue::Text("1500".into()));
}

#[tokio::test]
async fn server_rendered_page_parses_with_comma_grouping() {
    let transport = Arc::new(MockTransport::new().on_get(
        "https://www.codechef.com/users/carol",
        r#"<div class="rating-number">1432</div>
           <section class="problems-solved">
               <h3>Total Problems Solved: 1,234</h3>
           </section>"#,
    ));

    let result = aggregator(transport)
        .fetch(PlatformId::CodeChef, "carol")
        .await;

    assert_eq!(result.source_strategy, "selectors");
    assert_eq!(result.metrics["currentRating"], MetricValue::Count(1432));
    assert_eq!(result.metrics["problemsSolved"], MetricValue::Count(1234));
}

#[tokio::test]
async fn text_scan_is_the_last_resort_and_works() {
    // Page with none of the known selectors or script payloads, just
    // visible text with marker-adjacent numbers.
    let transport = Arc::new(MockTransport::new().on_get(
        "https://www.geeksforgeeks.org/user/dave/",
        r#"<html><body>
               <div>Coding Score</div><div>850</div>
               <div>Problem Solved</div><div>312</div>
           </body></html>"#,
    ));

    let result = aggregator(Arc::clone(&transport))
        .fetch(PlatformId::GeeksForGeeks, "dave")
        .await;

    assert_eq!(result.source_strategy, "text-scan");
    assert_eq!(result.metrics["problemsSolved"], MetricValue::Count(312));
    assert_eq!(result.metrics["codingScore"], MetricValue::Count(850));
    // Selector and script rungs each fetched the page before text scan won.
    assert_eq!(transport.request_count(), 3);
}

#[tokio::test]
async fn exhausted_cascade_degrades_to_zero_fill() {
    let transport = Arc::new(MockTransport::new());

    let result = aggregator(Arc::clone(&transport))
        .fetch(PlatformId::HackerRank, "ghost")
        .await;

    assert_eq!(result.source_strategy, "none");
    assert_eq!(result.error.as_deref(), Some(FETCH_FAILED));
    assert_eq!(result.metrics["problemsSolved"], MetricValue::Count(0));
    assert_eq!(result.metrics["badges"], MetricValue::Count(0));
    assert_eq!(result.metrics["totalStars"], MetricValue::Count(0));
    // Every rung was attempted exactly once.
    assert_eq!(transport.request_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn slow_strategy_times_out_and_the_next_rung_wins() {
    let transport = Arc::new(
        MockTransport::new()
            .on_get(
                "https://codeforces.com/api/user.info?handles=erin",
                r#"{ "status": "OK", "result": [{ "rating": 2100 }] }"#,
            )
            .delay_on("api/user.info", Duration::from_secs(60))
            .on_get(
                "https://codeforces.com/profile/erin",
                r#"<div class="info"><ul><li><span class="user-violet">2099</span></li></ul></div>"#,
            ),
    );

    let result = StatAggregator::new(transport.clone())
        .with_timeout(Duration::from_secs(2))
        .fetch(PlatformId::Codeforces, "erin")
        .await;

    // The API rung hung past its per-attempt budget; the selector rung
    // delivered, so the slow rung never poisons the result.
    assert_eq!(result.source_strategy, "selectors");
    assert_eq!(result.metrics["currentRating"], MetricValue::Count(2099));
}

#[tokio::test]
async fn failed_validity_falls_through_without_error() {
    // The badges endpoint answers, but with an empty track list. That parses
    // cleanly yet fails the validity predicate, so the cascade keeps going.
    let transport = Arc::new(MockTransport::new().on_get(
        "https://www.hackerrank.com/rest/hackers/frank/badges",
        r#"{ "models": [] }"#,
    ));

    let result = aggregator(Arc::clone(&transport))
        .fetch(PlatformId::HackerRank, "frank")
        .await;

    assert_eq!(result.source_strategy, "none");
    assert_eq!(transport.requests_matching("rest/hackers"), 1);
    assert_eq!(transport.requests_matching("profile"), 2);
}
