//! Test utilities for location sources.
//!
//! [`StubLocationSource`] is a scripted [`LocationSource`] returning
//! pre-configured responses without making HTTP requests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use placefinder_core::Category;
use serde_json::{Map, Value};

use crate::{LocationSource, RawLocation, TransportError};

type LayerResult = Result<Vec<RawLocation>, TransportError>;

#[derive(Debug, Default)]
struct Script {
    queued: VecDeque<LayerResult>,
    fallback: Option<LayerResult>,
    attempts: usize,
}

/// Scripted `LocationSource` for tests.
///
/// Each category replays its queued responses in order, then repeats its
/// fallback. Categories with no script return an empty layer.
///
/// # Example
///
/// ```
/// use placefinder_core::Category;
/// use placefinder_data::LocationSource;
/// use placefinder_data::test_support::{StubLocationSource, raw_location};
///
/// let source = StubLocationSource::default()
///     .always_return(Category::Bikes, vec![raw_location(42.0, -76.5, "rack")]);
///
/// let records = source.fetch_layer(Category::Bikes).expect("scripted layer");
/// assert_eq!(records.len(), 1);
/// assert_eq!(source.attempts(Category::Bikes), 1);
/// ```
#[derive(Debug, Default)]
pub struct StubLocationSource {
    scripts: Mutex<HashMap<Category, Script>>,
}

impl StubLocationSource {
    /// Queue a successful response for the next attempt at `category`.
    #[must_use]
    pub fn then_return(self, category: Category, records: Vec<RawLocation>) -> Self {
        self.script(category, |script| script.queued.push_back(Ok(records)))
    }

    /// Queue a failed attempt for `category`.
    #[must_use]
    pub fn then_fail(self, category: Category, error: TransportError) -> Self {
        self.script(category, |script| script.queued.push_back(Err(error)))
    }

    /// Answer every unscripted attempt at `category` with `records`.
    #[must_use]
    pub fn always_return(self, category: Category, records: Vec<RawLocation>) -> Self {
        self.script(category, |script| script.fallback = Some(Ok(records)))
    }

    /// Fail every unscripted attempt at `category` with `error`.
    #[must_use]
    pub fn always_fail(self, category: Category, error: TransportError) -> Self {
        self.script(category, |script| script.fallback = Some(Err(error)))
    }

    /// Number of attempts made against `category`.
    ///
    /// # Panics
    ///
    /// Panics if the script lock was poisoned by a panicking test.
    #[must_use]
    pub fn attempts(&self, category: Category) -> usize {
        self.scripts
            .lock()
            .expect("stub script lock poisoned")
            .get(&category)
            .map_or(0, |script| script.attempts)
    }

    fn script(self, category: Category, edit: impl FnOnce(&mut Script)) -> Self {
        {
            let mut scripts = self.scripts.lock().expect("stub script lock poisoned");
            edit(scripts.entry(category).or_default());
        }
        self
    }
}

impl LocationSource for StubLocationSource {
    fn fetch_layer(&self, category: Category) -> Result<Vec<RawLocation>, TransportError> {
        let mut scripts = self.scripts.lock().expect("stub script lock poisoned");
        let script = scripts.entry(category).or_default();
        script.attempts += 1;
        script
            .queued
            .pop_front()
            .or_else(|| script.fallback.clone())
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Provider record with numeric coordinates and a name.
#[must_use]
pub fn raw_location(latitude: f64, longitude: f64, name: &str) -> RawLocation {
    let mut fields = Map::new();
    fields.insert("Lat".to_owned(), Value::from(latitude));
    fields.insert("Lng".to_owned(), Value::from(longitude));
    fields.insert("Name".to_owned(), Value::from(name));
    RawLocation::new(fields)
}

/// Provider record with a name but no coordinates.
#[must_use]
pub fn raw_location_without_coordinates(name: &str) -> RawLocation {
    let mut fields = Map::new();
    fields.insert("Name".to_owned(), Value::from(name));
    RawLocation::new(fields)
}
