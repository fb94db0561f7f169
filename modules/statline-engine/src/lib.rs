//! Resilient multi-source profile-statistics extraction.
//!
//! Each supported platform gets an ordered cascade of extraction strategies
//! (structured API query, CSS selectors, embedded-script patterns, visible
//! text scan). The cascade short-circuits on the first strategy whose output
//! passes the platform's validity predicate; total failure degrades to a
//! zero-filled canonical result instead of an error. The orchestrator fans
//! out one task per platform and joins them all, so a broken site never
//! takes down the rest of the batch.

pub mod cascade;
pub mod normalize;
pub mod orchestrator;
pub mod platforms;
pub mod strategy;
pub mod testing;

pub use cascade::{run_cascade, CascadeOutcome, CascadeStep};
pub use normalize::{normalize, FETCH_FAILED};
pub use orchestrator::StatAggregator;
pub use platforms::PlatformAdapter;
pub use strategy::ExtractionStrategy;
