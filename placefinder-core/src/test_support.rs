//! Test-only helpers shared by unit and behaviour tests.

use thiserror::Error;

use crate::{
    NearestQuery, NewPlace, PROBE_CATEGORY, PROBE_NAME, Place, PlaceFilter, PlaceId, PlaceStore,
};

/// A handful of places around the Ithaca campus, spread over three categories.
#[must_use]
pub fn campus_places() -> Vec<NewPlace> {
    vec![
        NewPlace::new(42.4440, -76.5019, "Clocktower rack", "Bikes"),
        NewPlace::new(42.4450, -76.4830, "Statler rack", "Bikes"),
        NewPlace::new(42.4478, -76.4845, "Olin fountain", "Water"),
        NewPlace::new(42.4501, -76.4810, "Uris fountain", "Water"),
        NewPlace::new(42.4470, -76.4820, "Ho Plaza phone", "Blue"),
    ]
}

/// Error raised by [`MemoryPlaceStore`] writes against missing places.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("place {id} does not exist")]
pub struct MissingMemoryPlace {
    /// Identifier of the missing place.
    pub id: PlaceId,
}

/// In-memory `PlaceStore` implementation used in tests.
///
/// Nearest queries use a linear scan, so results double as a reference for
/// SQL-backed stores.
#[derive(Debug, Default)]
pub struct MemoryPlaceStore {
    places: Vec<Place>,
    next_id: PlaceId,
}

impl MemoryPlaceStore {
    /// Create a store holding `places` with identifiers assigned in order.
    pub fn with_places<I>(places: I) -> Self
    where
        I: IntoIterator<Item = NewPlace>,
    {
        let mut store = Self::default();
        for fields in places {
            store.insert(fields);
        }
        store
    }

    fn insert(&mut self, fields: NewPlace) -> Place {
        self.next_id += 1;
        let place = Place::from_fields(self.next_id, fields);
        self.places.push(place.clone());
        place
    }
}

impl PlaceStore for MemoryPlaceStore {
    type Error = MissingMemoryPlace;

    fn list(&self, filter: &PlaceFilter) -> Result<Vec<Place>, Self::Error> {
        Ok(self
            .places
            .iter()
            .filter(|place| filter.matches(place))
            .cloned()
            .collect())
    }

    fn get_by_id(&self, id: PlaceId) -> Result<Option<Place>, Self::Error> {
        Ok(self.places.iter().find(|place| place.id() == id).cloned())
    }

    fn get_by_name(&self, name: &str) -> Result<Option<Place>, Self::Error> {
        Ok(self.places.iter().find(|place| place.name() == name).cloned())
    }

    fn create(&mut self, fields: NewPlace) -> Result<Place, Self::Error> {
        Ok(self.insert(fields))
    }

    fn create_many(&mut self, fields: &[NewPlace]) -> Result<Vec<Place>, Self::Error> {
        Ok(fields.iter().cloned().map(|place| self.insert(place)).collect())
    }

    fn update(&mut self, place: &Place, fields: NewPlace) -> Result<Place, Self::Error> {
        let id = place.id();
        let slot = self
            .places
            .iter_mut()
            .find(|stored| stored.id() == id)
            .ok_or(MissingMemoryPlace { id })?;
        *slot = Place::from_fields(id, fields);
        Ok(slot.clone())
    }

    fn delete(&mut self, place: Place) -> Result<Place, Self::Error> {
        let id = place.id();
        let index = self
            .places
            .iter()
            .position(|stored| stored.id() == id)
            .ok_or(MissingMemoryPlace { id })?;
        Ok(self.places.remove(index))
    }

    fn nearest(&mut self, query: &NearestQuery) -> Vec<Place> {
        let in_category = self
            .places
            .iter()
            .filter(|place| place.category() == query.category);
        if query.is_unbounded() {
            return in_category.cloned().collect();
        }
        let mut scored: Vec<(f64, &Place)> = in_category
            .map(|place| (query.distance_to(place.position().0), place))
            .filter(|(distance, _)| *distance < query.max_distance_m)
            .collect();
        scored.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.id().cmp(&b.1.id())));
        let limit = usize::try_from(query.effective_limit()).unwrap_or(usize::MAX);
        scored
            .into_iter()
            .take(limit)
            .map(|(_, place)| place.clone())
            .collect()
    }
}

/// Count probe rows left behind in `store`.
pub fn probe_rows<S>(store: &S) -> Result<usize, S::Error>
where
    S: PlaceStore,
{
    let filter = PlaceFilter::default()
        .with_category(PROBE_CATEGORY)
        .with_name_containing(PROBE_NAME);
    Ok(store
        .list(&filter)?
        .into_iter()
        .filter(|place| place.name() == PROBE_NAME)
        .count())
}
