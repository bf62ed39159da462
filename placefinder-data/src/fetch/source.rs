//! Abstraction over the map-data provider.

use placefinder_core::Category;

use super::{RawLocation, TransportError};

/// Fetch one provider layer per call.
///
/// Implementations make exactly one attempt; retry policy lives in
/// [`LocationFetcher`](super::LocationFetcher).
pub trait LocationSource {
    /// Fetch every record in `category`'s layer, in provider order.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the request fails or the body cannot
    /// be decoded.
    fn fetch_layer(&self, category: Category) -> Result<Vec<RawLocation>, TransportError>;
}

impl<S> LocationSource for &S
where
    S: LocationSource + ?Sized,
{
    fn fetch_layer(&self, category: Category) -> Result<Vec<RawLocation>, TransportError> {
        (**self).fetch_layer(category)
    }
}
