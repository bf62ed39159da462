//! Facade crate for the place finder.
//!
//! This crate re-exports the place catalogue and exposes the SQLite store and
//! provider ingestion behind feature flags.

#![forbid(unsafe_code)]

pub use placefinder_core::catalogue;
pub use placefinder_core::{
    CatalogueError, Category, NearbyParams, NearestQuery, NewPlace, Place, PlaceFilter, PlaceId,
    PlaceStore, UnknownCategory, great_circle_distance,
};

#[cfg(feature = "store-sqlite")]
pub use placefinder_core::{SqlitePlaceStore, SqlitePlaceStoreError};

#[cfg(feature = "ingest")]
pub use placefinder_data::{
    FetchFailure, HttpLocationSource, HttpLocationSourceConfig, LocationFetcher, LocationSource,
    SeedError, SeedReport, seed_from_source, seed_places,
};
