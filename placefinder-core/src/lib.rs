//! Core domain types for the place finder.
//!
//! A [`Place`] is a named WGS84 point tagged with a category. Places live in a
//! [`PlaceStore`], which answers id and name lookups, filtered listings and
//! nearest-neighbour queries described by [`NearestQuery`]. The
//! [`catalogue`] module layers the service's naming and not-found rules on top
//! of any store.
//!
//! # Examples
//!
//! ```
//! use placefinder_core::{NearestQuery, NewPlace, PlaceStore, SqlitePlaceStore};
//!
//! # fn main() -> Result<(), placefinder_core::SqlitePlaceStoreError> {
//! let mut store = SqlitePlaceStore::open_in_memory()?;
//! store.create_many(&[
//!     NewPlace::new(42.4440, -76.5019, "Clocktower rack", "Bikes"),
//!     NewPlace::new(42.4450, -76.4830, "Statler rack", "Bikes"),
//! ])?;
//!
//! let query = NearestQuery::new(42.4441, -76.5018, "Bikes")
//!     .within_meters(2_000.0)
//!     .with_limit(1);
//! let nearest = store.nearest(&query);
//! assert_eq!(nearest[0].name(), "Clocktower rack");
//! # Ok(())
//! # }
//! ```

pub mod catalogue;
mod place;
mod query;
mod store;

#[doc(hidden)]
pub mod test_support;

pub use catalogue::{CatalogueError, NearbyParams};
pub use place::{Category, NewPlace, Place, PlaceId, UnknownCategory};
pub use query::{NearestQuery, PROBE_CATEGORY, PROBE_NAME, great_circle_distance};
pub use store::{PlaceFilter, PlaceStore};

#[cfg(feature = "store-sqlite")]
pub use store::{SqlitePlaceStore, SqlitePlaceStoreError};
