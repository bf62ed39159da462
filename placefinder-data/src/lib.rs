//! Map-data ingestion for the place finder.
//!
//! Responsibilities:
//! - Fetch provider layers with bounded retry.
//! - Normalise loosely typed provider records into place fields.
//! - Seed a [`PlaceStore`](placefinder_core::PlaceStore) in one transaction.
//!
//! Boundaries:
//! - Do not encode catalogue rules (live in `placefinder-core`).
//! - Never return data from a failed fetch attempt.
//!
//! Invariants:
//! - Category order follows [`Category::ALL`](placefinder_core::Category::ALL).
//! - No global mutable state.

pub mod fetch;
mod normalise;
mod seed;

#[doc(hidden)]
pub mod test_support;

pub use fetch::{
    FetchFailure, HttpLocationSource, HttpLocationSourceConfig, LocationFetcher, LocationSource,
    RawLocation, SourceBuildError, TransportError,
};
pub use normalise::{NormalisedLocation, normalise};
pub use seed::{SeedError, SeedReport, seed_from_source, seed_places};
