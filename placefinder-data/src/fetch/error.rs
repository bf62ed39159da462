//! Errors raised while fetching provider layers.

use placefinder_core::Category;
use thiserror::Error;

/// Failure of a single request to the map-data provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The provider answered with a non-success status.
    #[error("request to {url} failed with HTTP {status}: {message}")]
    Http {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error description.
        message: String,
    },
    /// The request exceeded the per-attempt timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Requested URL.
        url: String,
        /// Timeout that elapsed, in seconds.
        timeout_secs: u64,
    },
    /// Connection or transfer failure.
    #[error("network error requesting {url}: {message}")]
    Network {
        /// Requested URL.
        url: String,
        /// Error description.
        message: String,
    },
    /// The response body was not a layer document.
    #[error("failed to decode response from {url}: {message}")]
    Decode {
        /// Requested URL.
        url: String,
        /// Decoder error description.
        message: String,
    },
    /// The configured base URL could not be turned into a request URL.
    #[error("invalid provider URL {base_url}: {message}")]
    InvalidUrl {
        /// Configured base URL.
        base_url: String,
        /// Parser error description.
        message: String,
    },
}

/// Every attempt to fetch one category failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to fetch {category} locations after {attempts} attempt(s)")]
pub struct FetchFailure {
    /// Category whose layer could not be fetched.
    pub category: Category,
    /// Number of attempts made.
    pub attempts: u32,
    /// Error from the final attempt.
    #[source]
    pub last_error: TransportError,
}

/// Error raised when building an HTTP location source.
#[derive(Debug, Error)]
pub enum SourceBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
}
