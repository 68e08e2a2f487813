//! Transport-level failures.

use thiserror::Error;

/// Errors encountered while issuing HTTP requests for CSV content.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum TransportError {
    /// The server answered with a non-success status.
    #[error("request to {url} failed with status {status}: {message}")]
    Http {
        /// Fully qualified request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Short error description.
        message: String,
    },
    /// The request did not complete within the configured timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Fully qualified request URL.
        url: String,
        /// Timeout that elapsed, in seconds.
        timeout_secs: u64,
    },
    /// Connection, TLS, or body streaming failure.
    #[error("network error contacting {url}: {message}")]
    Network {
        /// Fully qualified request URL.
        url: String,
        /// Error reported by the HTTP client.
        message: String,
    },
}

/// Failure to construct an [`HttpTransport`](super::HttpTransport).
#[derive(Debug, Error)]
#[error("failed to build HTTP client: {source}")]
pub struct TransportBuildError {
    #[from]
    source: reqwest::Error,
}
