//! Data access traits for places.
//!
//! The `PlaceStore` trait covers create/read/update/delete by identifier,
//! exact-name lookup, filtered listing, and the nearest-neighbour query.
//! Mutating operations are atomic: either every field is written or none is.

use crate::{NearestQuery, NewPlace, Place, PlaceId};

#[cfg(feature = "store-sqlite")]
mod probe;
#[cfg(feature = "store-sqlite")]
mod sqlite;

#[cfg(feature = "store-sqlite")]
pub use sqlite::{SqlitePlaceStore, SqlitePlaceStoreError};

/// Optional listing constraints.
///
/// An empty filter matches every place.
///
/// # Examples
/// ```
/// use placefinder_core::PlaceFilter;
///
/// let filter = PlaceFilter::default()
///     .with_category("Water")
///     .with_name_containing("Hall");
/// assert_eq!(filter.category.as_deref(), Some("Water"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceFilter {
    /// Exact category to match.
    pub category: Option<String>,
    /// Case-sensitive substring the name must contain.
    pub name_contains: Option<String>,
}

impl PlaceFilter {
    /// Restrict the listing to one category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Restrict the listing to names containing `fragment`.
    #[must_use]
    pub fn with_name_containing(mut self, fragment: impl Into<String>) -> Self {
        self.name_contains = Some(fragment.into());
        self
    }

    /// Whether `place` satisfies every constraint.
    #[must_use]
    pub fn matches(&self, place: &Place) -> bool {
        let category_ok = self
            .category
            .as_deref()
            .is_none_or(|category| place.category() == category);
        let name_ok = self
            .name_contains
            .as_deref()
            .is_none_or(|fragment| place.name().contains(fragment));
        category_ok && name_ok
    }
}

/// Read/write access to persisted places.
///
/// Lookups report absence as `Ok(None)`, keeping "found nothing" distinct
/// from "failed".
pub trait PlaceStore {
    /// Error raised by the backing storage.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Return places matching `filter` in storage order.
    fn list(&self, filter: &PlaceFilter) -> Result<Vec<Place>, Self::Error>;

    /// Look up a place by identifier.
    fn get_by_id(&self, id: PlaceId) -> Result<Option<Place>, Self::Error>;

    /// Look up the first place, in storage order, whose name equals `name`.
    ///
    /// Matching is exact and case-sensitive. Names are not unique.
    fn get_by_name(&self, name: &str) -> Result<Option<Place>, Self::Error>;

    /// Persist a new place and return it with its assigned identifier.
    fn create(&mut self, fields: NewPlace) -> Result<Place, Self::Error>;

    /// Persist many places as a single unit.
    fn create_many(&mut self, fields: &[NewPlace]) -> Result<Vec<Place>, Self::Error>;

    /// Overwrite every field of `place`, recomputing its position.
    fn update(&mut self, place: &Place, fields: NewPlace) -> Result<Place, Self::Error>;

    /// Remove `place` and hand it back for reporting.
    fn delete(&mut self, place: Place) -> Result<Place, Self::Error>;

    /// Run a nearest-neighbour query.
    ///
    /// See [`NearestQuery`] for the radius and limit rules. The query is
    /// best effort: storage failures are logged and yield whatever results
    /// were collected before the failure, usually none.
    fn nearest(&mut self, query: &NearestQuery) -> Vec<Place>;
}
