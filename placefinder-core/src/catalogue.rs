//! Catalogue operations with the service's lookup and naming rules.
//!
//! Each function maps onto one endpoint of the places service: listing,
//! lookup, creation, full update, deletion, and the nearby query with its
//! parameter defaults. Transport and marshalling stay with the caller.
//!
//! Places written here must carry one of the provider's [`Category`] tags.
//! The store itself accepts any tag, which the nearest query relies on for
//! its probe row.

use log::debug;
use thiserror::Error;

use crate::{
    Category, NearestQuery, NewPlace, Place, PlaceFilter, PlaceId, PlaceStore, UnknownCategory,
};

/// Error raised by catalogue operations.
#[derive(Debug, Error)]
pub enum CatalogueError {
    /// No place has the requested identifier.
    #[error("place {id} does not exist")]
    NotFound {
        /// Identifier that was looked up.
        id: PlaceId,
    },
    /// Another place already uses the requested name.
    #[error("a place named {name:?} already exists")]
    DuplicateName {
        /// Name that clashed.
        name: String,
    },
    /// The category is not one of the provider's location tags.
    #[error(transparent)]
    UnknownCategory(#[from] UnknownCategory),
    /// The backing store failed.
    #[error("place store failed: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl CatalogueError {
    fn store<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Store(Box::new(err))
    }
}

/// Optional parameters of the nearby query.
///
/// Missing values fall back to `lat = 0`, `lon = 0`, `m = -1` and `k = -1`,
/// so an empty request lists the whole category.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NearbyParams {
    /// Query latitude in degrees.
    pub lat: Option<f64>,
    /// Query longitude in degrees.
    pub lon: Option<f64>,
    /// Search radius in metres.
    pub m: Option<f64>,
    /// Maximum number of results.
    pub k: Option<i64>,
}

impl NearbyParams {
    /// Resolve defaults into a query for `category`.
    #[must_use]
    pub fn into_query(self, category: &str) -> NearestQuery {
        NearestQuery::new(self.lat.unwrap_or(0.0), self.lon.unwrap_or(0.0), category)
            .within_meters(self.m.unwrap_or(-1.0))
            .with_limit(self.k.unwrap_or(-1))
    }
}

/// List places matching `filter`.
pub fn list_places<S>(store: &S, filter: &PlaceFilter) -> Result<Vec<Place>, CatalogueError>
where
    S: PlaceStore,
{
    store.list(filter).map_err(CatalogueError::store)
}

/// Fetch one place or fail with [`CatalogueError::NotFound`].
pub fn find_place<S>(store: &S, id: PlaceId) -> Result<Place, CatalogueError>
where
    S: PlaceStore,
{
    store
        .get_by_id(id)
        .map_err(CatalogueError::store)?
        .ok_or(CatalogueError::NotFound { id })
}

/// Create a place unless its name is already taken.
///
/// The category must parse as a [`Category`].
///
/// The name check and the insert are separate steps; two concurrent callers
/// on different connections can both pass the check.
///
/// # Examples
/// ```
/// use placefinder_core::catalogue::{CatalogueError, add_place};
/// use placefinder_core::{NewPlace, SqlitePlaceStore};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut store = SqlitePlaceStore::open_in_memory()?;
/// add_place(&mut store, NewPlace::new(42.0, -76.5, "Fountain", "Water"))?;
///
/// let again = add_place(&mut store, NewPlace::new(1.0, 1.0, "Fountain", "Water"));
/// assert!(matches!(again, Err(CatalogueError::DuplicateName { .. })));
/// # Ok(())
/// # }
/// ```
pub fn add_place<S>(store: &mut S, fields: NewPlace) -> Result<Place, CatalogueError>
where
    S: PlaceStore,
{
    fields.category.parse::<Category>()?;
    if store
        .get_by_name(&fields.name)
        .map_err(CatalogueError::store)?
        .is_some()
    {
        return Err(CatalogueError::DuplicateName { name: fields.name });
    }
    let place = store.create(fields).map_err(CatalogueError::store)?;
    debug!("added place {}", place.id());
    Ok(place)
}

/// Overwrite every field of place `id`.
///
/// Keeping the current name is allowed; taking a name held by a different
/// place is not. The category must parse as a [`Category`].
pub fn edit_place<S>(store: &mut S, id: PlaceId, fields: NewPlace) -> Result<Place, CatalogueError>
where
    S: PlaceStore,
{
    let place = find_place(store, id)?;
    fields.category.parse::<Category>()?;
    let holder = store
        .get_by_name(&fields.name)
        .map_err(CatalogueError::store)?;
    if holder.is_some_and(|other| other.id() != id) {
        return Err(CatalogueError::DuplicateName { name: fields.name });
    }
    store.update(&place, fields).map_err(CatalogueError::store)
}

/// Delete place `id` and return what was removed.
pub fn remove_place<S>(store: &mut S, id: PlaceId) -> Result<Place, CatalogueError>
where
    S: PlaceStore,
{
    let place = find_place(store, id)?;
    store.delete(place).map_err(CatalogueError::store)
}

/// Places of `category` near a point, with service defaults applied.
pub fn nearby_places<S>(store: &mut S, category: Category, params: NearbyParams) -> Vec<Place>
where
    S: PlaceStore,
{
    store.nearest(&params.into_query(category.as_str()))
}
