//! Mapping of provider records onto the place schema.

use placefinder_core::{Category, NewPlace};

use crate::RawLocation;

/// A provider record mapped onto place fields.
///
/// Coordinates stay optional: records without them survive normalisation and
/// are rejected at seed time.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalisedLocation {
    /// Latitude in degrees, if the record had one.
    pub latitude: Option<f64>,
    /// Longitude in degrees, if the record had one.
    pub longitude: Option<f64>,
    /// Display name, empty when the record had none.
    pub name: String,
    /// Layer the record was fetched from.
    pub category: Category,
}

impl NormalisedLocation {
    /// Place fields for this location, or `None` when a coordinate is missing.
    #[must_use]
    pub fn to_new_place(&self) -> Option<NewPlace> {
        let (latitude, longitude) = self.latitude.zip(self.longitude)?;
        Some(NewPlace::new(
            latitude,
            longitude,
            self.name.clone(),
            self.category.as_str(),
        ))
    }
}

/// Map `raw` onto place fields and attach `category`.
///
/// # Examples
/// ```
/// use placefinder_core::Category;
/// use placefinder_data::normalise;
/// use placefinder_data::test_support::raw_location;
///
/// let location = normalise(&raw_location(42.444, -76.5019, "None"), Category::Blue);
/// assert_eq!(location.latitude, Some(42.444));
/// assert_eq!(location.name, "");
/// ```
#[must_use]
pub fn normalise(raw: &RawLocation, category: Category) -> NormalisedLocation {
    NormalisedLocation {
        latitude: raw.latitude(),
        longitude: raw.longitude(),
        name: raw.name(),
        category,
    }
}
