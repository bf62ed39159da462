//! Bulk loading of normalised locations into a place store.

use std::collections::HashMap;

use log::{info, warn};
use placefinder_core::{Category, NewPlace, PlaceStore};
use thiserror::Error;

use crate::normalise::NormalisedLocation;
use crate::{FetchFailure, LocationFetcher, LocationSource};

/// Error raised while seeding a store.
#[derive(Debug, Error)]
pub enum SeedError {
    /// A provider layer could not be fetched; nothing was written.
    #[error(transparent)]
    Fetch(#[from] FetchFailure),
    /// The store rejected the batch; nothing was written.
    #[error("failed to store seeded places: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Outcome of a seeding run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Places written to the store.
    pub inserted: usize,
    /// Locations dropped for lacking a coordinate.
    pub skipped: usize,
    per_category: HashMap<Category, usize>,
}

impl SeedReport {
    /// Places written for `category`.
    #[must_use]
    pub fn inserted_in(&self, category: Category) -> usize {
        self.per_category.get(&category).copied().unwrap_or(0)
    }
}

/// Insert every location that has both coordinates, in one transaction.
///
/// # Errors
///
/// Returns [`SeedError::Store`] when the batch insert fails.
///
/// # Examples
/// ```
/// use placefinder_core::{Category, SqlitePlaceStore};
/// use placefinder_data::test_support::raw_location;
/// use placefinder_data::{normalise, seed_places};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut store = SqlitePlaceStore::open_in_memory()?;
/// let locations = vec![normalise(&raw_location(42.0, -76.5, "rack"), Category::Bikes)];
/// let report = seed_places(&mut store, &locations)?;
/// assert_eq!(report.inserted_in(Category::Bikes), 1);
/// # Ok(())
/// # }
/// ```
pub fn seed_places<S>(
    store: &mut S,
    locations: &[NormalisedLocation],
) -> Result<SeedReport, SeedError>
where
    S: PlaceStore,
{
    let mut report = SeedReport::default();
    let mut batch: Vec<NewPlace> = Vec::with_capacity(locations.len());
    for location in locations {
        if let Some(place) = location.to_new_place() {
            batch.push(place);
            *report.per_category.entry(location.category).or_default() += 1;
        } else {
            warn!(
                "skipping {} location {:?}: missing coordinates",
                location.category, location.name
            );
            report.skipped += 1;
        }
    }

    let created = store
        .create_many(&batch)
        .map_err(|err| SeedError::Store(Box::new(err)))?;
    report.inserted = created.len();
    info!(
        "seeded {} place(s), skipped {}",
        report.inserted, report.skipped
    );
    Ok(report)
}

/// Fetch every layer through `fetcher`, then seed `store`.
///
/// # Errors
///
/// Returns [`SeedError::Fetch`] before writing anything when a layer cannot
/// be fetched, or [`SeedError::Store`] when the batch insert fails.
pub fn seed_from_source<S, L>(
    store: &mut S,
    fetcher: &LocationFetcher<L>,
) -> Result<SeedReport, SeedError>
where
    S: PlaceStore,
    L: LocationSource,
{
    let locations = fetcher.fetch_all()?;
    seed_places(store, &locations)
}
