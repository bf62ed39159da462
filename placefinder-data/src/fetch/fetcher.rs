//! Bounded-retry fetching across provider layers.

use log::{debug, warn};
use placefinder_core::Category;

use super::{FetchFailure, LocationSource, RawLocation};
use crate::normalise::{NormalisedLocation, normalise};

/// Attempts made per category unless configured otherwise.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Fetch layers from a [`LocationSource`], retrying failed attempts.
///
/// Retries are immediate; there is no backoff between attempts.
///
/// # Examples
/// ```
/// use placefinder_core::Category;
/// use placefinder_data::LocationFetcher;
/// use placefinder_data::test_support::StubLocationSource;
///
/// let source = StubLocationSource::default();
/// let fetcher = LocationFetcher::new(&source).with_max_attempts(2);
/// assert!(fetcher.fetch(Category::Water).expect("fetch").is_empty());
/// assert_eq!(source.attempts(Category::Water), 1);
/// ```
#[derive(Debug, Clone)]
pub struct LocationFetcher<S> {
    source: S,
    max_attempts: u32,
}

impl<S> LocationFetcher<S>
where
    S: LocationSource,
{
    /// Wrap `source` with the default attempt budget.
    pub const fn new(source: S) -> Self {
        Self {
            source,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Set the total number of attempts per category. Zero is treated as one.
    #[must_use]
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Total attempts made per category.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Fetch one category's raw records.
    ///
    /// # Errors
    ///
    /// Returns [`FetchFailure`] carrying the last transport error once every
    /// attempt has failed. Data from failed attempts is never returned.
    pub fn fetch(&self, category: Category) -> Result<Vec<RawLocation>, FetchFailure> {
        let mut attempt = 1;
        loop {
            match self.source.fetch_layer(category) {
                Ok(records) => {
                    debug!(
                        "fetched {} {category} record(s) on attempt {attempt}",
                        records.len()
                    );
                    return Ok(records);
                }
                Err(err) => {
                    warn!(
                        "attempt {attempt}/{} to fetch {category} failed: {err}",
                        self.max_attempts
                    );
                    if attempt >= self.max_attempts {
                        return Err(FetchFailure {
                            category,
                            attempts: attempt,
                            last_error: err,
                        });
                    }
                    attempt += 1;
                }
            }
        }
    }

    /// Fetch and normalise every category in [`Category::ALL`] order.
    ///
    /// Records keep provider order within each category.
    ///
    /// # Errors
    ///
    /// Stops at the first category whose attempts are exhausted and returns
    /// its [`FetchFailure`]; records already fetched are discarded.
    pub fn fetch_all(&self) -> Result<Vec<NormalisedLocation>, FetchFailure> {
        let mut locations = Vec::new();
        for category in Category::ALL {
            let records = self.fetch(category)?;
            locations.extend(records.iter().map(|raw| normalise(raw, category)));
        }
        Ok(locations)
    }
}
