//! Typed errors for extraction attempts.

use thiserror::Error;

/// Errors that can occur while a single extraction strategy runs.
///
/// All of these are caught at the adapter boundary and converted into a
/// zero-metric `PlatformResult`; none of them escape to the orchestrator.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Network failure or non-2xx response
    #[error("transport error for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Strategy attempt exceeded its timeout
    #[error("timeout fetching {url}")]
    Timeout { url: String },

    /// Selector or pattern matched nothing, or a match could not be parsed
    #[error("structural parse error: {0}")]
    Structure(String),

    /// A parsed value failed its validity predicate
    #[error("validation failed: {0}")]
    Validation(String),

    /// Cascade exhausted with no strategy succeeding
    #[error("all extraction strategies exhausted")]
    Exhausted,
}

impl ExtractError {
    /// Shorthand for a transport error wrapping any error value.
    pub fn transport(
        url: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Transport {
            url: url.into(),
            source: source.into(),
        }
    }
}

/// Result type alias for extraction operations.
pub type ExtractResult<T> = std::result::Result<T, ExtractError>;
