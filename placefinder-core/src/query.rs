//! Nearest-neighbour query parameters and distance maths.
//!
//! Distances are great-circle distances on a sphere of Earth's mean radius
//! (haversine). No ellipsoidal correction is applied.

use geo::{Coord, Distance, Haversine, Point};

/// Name given to the transient probe row inserted by nearest queries.
pub const PROBE_NAME: &str = "temp_place";

/// Category given to the transient probe row inserted by nearest queries.
pub const PROBE_CATEGORY: &str = "temp_type";

/// Great-circle distance in metres between two WGS84 coordinates.
///
/// Coordinates use `x = longitude` and `y = latitude`.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use placefinder_core::great_circle_distance;
///
/// let here = Coord { x: -76.5019, y: 42.4440 };
/// assert_eq!(great_circle_distance(here, here), 0.0);
/// ```
#[must_use]
pub fn great_circle_distance(from: Coord<f64>, to: Coord<f64>) -> f64 {
    Haversine.distance(Point::from(from), Point::from(to))
}

/// Parameters for a k-nearest-places lookup.
///
/// Two branches apply:
///
/// - `max_distance_m > 0`: places of `category` strictly closer than the
///   radius, ordered by ascending distance, truncated to the effective limit.
/// - `max_distance_m <= 0`: **every** place of `category` in storage order.
///   The limit is ignored in this branch; a missing radius means "the whole
///   category", not "the nearest `k` anywhere".
///
/// # Examples
/// ```
/// use placefinder_core::NearestQuery;
///
/// let query = NearestQuery::new(42.4440, -76.5019, "Bikes")
///     .within_meters(500.0)
///     .with_limit(3);
/// assert!(!query.is_unbounded());
/// assert_eq!(query.effective_limit(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NearestQuery {
    /// Query point with `x = longitude` and `y = latitude`.
    pub origin: Coord<f64>,
    /// Category to match exactly.
    pub category: String,
    /// Search radius in metres; non-positive disables distance filtering.
    pub max_distance_m: f64,
    /// Requested result count; negative values mean one.
    pub limit: i64,
}

impl NearestQuery {
    /// Query around a point with no radius and the default limit.
    pub fn new(latitude: f64, longitude: f64, category: impl Into<String>) -> Self {
        Self {
            origin: Coord {
                x: longitude,
                y: latitude,
            },
            category: category.into(),
            max_distance_m: -1.0,
            limit: -1,
        }
    }

    /// Restrict results to places closer than `meters`.
    #[must_use]
    pub const fn within_meters(mut self, meters: f64) -> Self {
        self.max_distance_m = meters;
        self
    }

    /// Set the requested result count.
    #[must_use]
    pub const fn with_limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    /// Whether the query skips distance filtering and ignores the limit.
    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.max_distance_m <= 0.0
    }

    /// Limit applied in the radius branch: negative requests become one.
    #[must_use]
    pub const fn effective_limit(&self) -> i64 {
        if self.limit < 0 { 1 } else { self.limit }
    }

    /// Distance from the query point to `location`, in metres.
    #[must_use]
    pub fn distance_to(&self, location: Coord<f64>) -> f64 {
        great_circle_distance(self.origin, location)
    }
}
