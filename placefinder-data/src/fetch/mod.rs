//! Location fetching from the campus map-data provider.
//!
//! The provider publishes one layer per [`Category`](placefinder_core::Category).
//! [`HttpLocationSource`] performs single attempts against the overlay-items
//! endpoint and [`LocationFetcher`] wraps any [`LocationSource`] with bounded
//! retry.

mod error;
mod fetcher;
mod http;
mod layer;
mod source;

pub use error::{FetchFailure, SourceBuildError, TransportError};
pub use fetcher::{DEFAULT_MAX_ATTEMPTS, LocationFetcher};
pub use http::{
    DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, HttpLocationSource,
    HttpLocationSourceConfig,
};
pub use layer::{LayerResponse, RawLocation};
pub use source::LocationSource;
