//! Places and the category tags used by the map-data feed.

use std::fmt;
use std::str::FromStr;

use geo::{Coord, Point};
use thiserror::Error;

/// Identifier assigned by the store when a place is created.
pub type PlaceId = i64;

/// A stored point of interest.
///
/// Coordinates are WGS84 degrees. The place keeps a single coordinate, so the
/// geography [`position`](Self::position) can never drift from
/// [`latitude`](Self::latitude) and [`longitude`](Self::longitude).
///
/// Places are only built by a store, which owns identifier assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    id: PlaceId,
    name: String,
    category: String,
    location: Coord<f64>,
}

impl Place {
    /// Combine a store-assigned identifier with the persisted fields.
    pub(crate) fn from_fields(id: PlaceId, fields: NewPlace) -> Self {
        let location = fields.location();
        Self {
            id,
            name: fields.name,
            category: fields.category,
            location,
        }
    }

    /// Identifier assigned by the store.
    #[must_use]
    pub const fn id(&self) -> PlaceId {
        self.id
    }

    /// Display name. May be empty.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Category tag, for example `"Bikes"`.
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.location.y
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.location.x
    }

    /// Geography point with `x = longitude` and `y = latitude`.
    #[must_use]
    pub fn position(&self) -> Point<f64> {
        Point::from(self.location)
    }

    /// Well-known text for the position, as persisted by SQL stores.
    #[must_use]
    pub fn position_wkt(&self) -> String {
        point_wkt(self.location)
    }
}

/// Field set written by create and update operations.
///
/// # Examples
/// ```
/// use placefinder_core::NewPlace;
///
/// let fields = NewPlace::new(42.4440, -76.5019, "Clocktower rack", "Bikes");
/// assert_eq!(fields.position().x(), -76.5019);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NewPlace {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Display name. May be empty.
    pub name: String,
    /// Category tag.
    pub category: String,
}

impl NewPlace {
    /// Build a field set from its parts.
    pub fn new(
        latitude: f64,
        longitude: f64,
        name: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            latitude,
            longitude,
            name: name.into(),
            category: category.into(),
        }
    }

    /// Coordinate with `x = longitude` and `y = latitude`.
    #[must_use]
    pub const fn location(&self) -> Coord<f64> {
        Coord {
            x: self.longitude,
            y: self.latitude,
        }
    }

    /// Geography point derived from the coordinates.
    #[must_use]
    pub fn position(&self) -> Point<f64> {
        Point::from(self.location())
    }
}

/// Render a coordinate as `POINT(lon lat)` well-known text.
pub(crate) fn point_wkt(location: Coord<f64>) -> String {
    format!("POINT({} {})", location.x, location.y)
}

#[cfg(feature = "serde")]
impl serde::Serialize for Place {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("Place", 6)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("latitude", &self.latitude())?;
        state.serialize_field("longitude", &self.longitude())?;
        state.serialize_field("position", &self.position_wkt())?;
        state.serialize_field("category", &self.category)?;
        state.end()
    }
}

/// Location layers published by the campus map-data provider.
///
/// The enumeration order is the order in which layers are fetched during
/// seeding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Category {
    /// Blue-light emergency phones.
    Blue,
    /// Gender-inclusive restrooms.
    AllGender,
    /// Water fountains and bottle fillers.
    Water,
    /// TCAT transit stops.
    #[cfg_attr(feature = "serde", serde(rename = "TCAT"))]
    Tcat,
    /// Bike racks.
    Bikes,
    /// Electric vehicle charging stations.
    Charging,
    /// Dining and food service locations.
    FoodServices,
    /// Parkmobile parking zones.
    Parkmobile,
}

impl Category {
    /// Every layer, in fetch order.
    pub const ALL: [Self; 8] = [
        Self::Blue,
        Self::AllGender,
        Self::Water,
        Self::Tcat,
        Self::Bikes,
        Self::Charging,
        Self::FoodServices,
        Self::Parkmobile,
    ];

    /// Tag as stored on places and sent to the provider.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Blue => "Blue",
            Self::AllGender => "AllGender",
            Self::Water => "Water",
            Self::Tcat => "TCAT",
            Self::Bikes => "Bikes",
            Self::Charging => "Charging",
            Self::FoodServices => "FoodServices",
            Self::Parkmobile => "Parkmobile",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown layer tag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown location category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_owned()))
    }
}
