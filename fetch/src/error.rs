use miette::Diagnostic;
use thiserror::Error;

use crate::sources::Source;

/// Error taxonomy for the fetch layer, matching the propagation policy
/// table in the ingestion core's error handling design: transient errors
/// are retried by the caller, throttling opens circuit breakers, and
/// unsupported-operation errors are a normal, expected outcome of the
/// source-client facade rather than a failure.
#[derive(Debug, Error, Diagnostic)]
pub enum FetchError {
    #[error("error building request for {url}")]
    RequestBuild {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("network error calling {url}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{source_name} returned HTTP {status} for {url}")]
    Status {
        source_name: &'static str,
        url: String,
        status: u16,
        #[source]
        source: reqwest::Error,
    },

    #[error("error decoding response body from {url}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("error deserializing JSON response from {url}")]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("exhausted {attempts} retry attempts fetching {url}")]
    RetriesExhausted { url: String, attempts: u32 },

    #[error("circuit breaker for {0:?} is open")]
    CircuitOpen(Source),

    #[error("rate limiter wait for {0:?} was cancelled")]
    RateLimiterCancelled(Source),

    #[error("{source_display} does not support {operation}")]
    Unsupported {
        source_display: &'static str,
        operation: &'static str,
    },

    #[error("error reading PDF at {path}")]
    PdfRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("all PDF text extraction methods failed for {path}")]
    PdfExtractionFailed { path: String },
}

impl FetchError {
    /// Whether this error class should be retried by the HTTP fetcher's
    /// retry loop. Vendor anti-scrape 429s masquerade as plain 4xx
    /// responses, so 4xx is retried alongside 5xx and network errors;
    /// callers that know better can special-case the status code
    /// themselves before it reaches here.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FetchError::Network { .. } | FetchError::Status { .. } | FetchError::Decode { .. }
        )
    }
}
