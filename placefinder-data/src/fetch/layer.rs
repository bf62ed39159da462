//! Provider response types for the overlay-items endpoint.
//!
//! Each layer document carries an `items` array of flat records. Records are
//! loosely typed: coordinates may arrive as numbers or numeric strings, and
//! names may be missing, `null`, or the text `"None"`.

use serde::Deserialize;
use serde_json::{Map, Value};

/// Layer document returned by the provider.
#[derive(Debug, Default, Deserialize)]
pub struct LayerResponse {
    /// Records in provider order. `None` when the field is missing or `null`.
    pub items: Option<Vec<RawLocation>>,
}

impl LayerResponse {
    /// Records in provider order, treating a missing list as empty.
    #[must_use]
    pub fn into_items(self) -> Vec<RawLocation> {
        self.items.unwrap_or_default()
    }
}

/// One provider record, kept as received.
///
/// # Examples
/// ```
/// use placefinder_data::RawLocation;
///
/// let raw: RawLocation =
///     serde_json::from_str(r#"{"Lat": "42.4440", "Lng": -76.5019, "Name": "None"}"#)
///         .expect("valid record");
/// assert_eq!(raw.latitude(), Some(42.4440));
/// assert_eq!(raw.longitude(), Some(-76.5019));
/// assert_eq!(raw.name(), "");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct RawLocation(Map<String, Value>);

/// Sentinel the provider uses for an absent name.
const NAME_SENTINEL: &str = "None";

impl RawLocation {
    /// Wrap a JSON object.
    #[must_use]
    pub const fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Raw value of `key`, if present.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The `Lat` field as degrees.
    #[must_use]
    pub fn latitude(&self) -> Option<f64> {
        self.field("Lat").and_then(as_degrees)
    }

    /// The `Lng` field as degrees.
    #[must_use]
    pub fn longitude(&self) -> Option<f64> {
        self.field("Lng").and_then(as_degrees)
    }

    /// The `Name` field as display text, empty when absent.
    ///
    /// Numbers and booleans are rendered in JSON form, so a boolean name
    /// becomes `"true"` or `"false"` in lower case.
    #[must_use]
    pub fn name(&self) -> String {
        match self.field("Name") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(name)) if name == NAME_SENTINEL => String::new(),
            Some(Value::String(name)) => name.clone(),
            Some(other) => other.to_string(),
        }
    }
}

impl From<Map<String, Value>> for RawLocation {
    fn from(fields: Map<String, Value>) -> Self {
        Self::new(fields)
    }
}

fn as_degrees(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn raw(value: Value) -> RawLocation {
        serde_json::from_value(value).expect("record should deserialise")
    }

    #[rstest]
    #[case(json!({"items": [{"Lat": 1.0}, {"Lat": 2.0}]}), 2)]
    #[case(json!({"items": []}), 0)]
    #[case(json!({"items": null}), 0)]
    #[case(json!({}), 0)]
    fn missing_items_mean_empty(#[case] body: Value, #[case] expected: usize) {
        let response: LayerResponse = serde_json::from_value(body).expect("deserialise layer");
        assert_eq!(response.into_items().len(), expected);
    }

    #[rstest]
    #[case(json!(42.5), Some(42.5))]
    #[case(json!(" -76.25 "), Some(-76.25))]
    #[case(json!("north"), None)]
    #[case(json!(null), None)]
    #[case(json!(true), None)]
    fn coordinates_accept_numbers_and_numeric_text(
        #[case] value: Value,
        #[case] expected: Option<f64>,
    ) {
        let record = raw(json!({"Lat": value.clone(), "Lng": value}));
        assert_eq!(record.latitude(), expected);
        assert_eq!(record.longitude(), expected);
    }

    #[rstest]
    fn out_of_range_coordinates_pass_through() {
        let record = raw(json!({"Lat": 123.0, "Lng": -540.0}));
        assert_eq!(record.latitude(), Some(123.0));
        assert_eq!(record.longitude(), Some(-540.0));
    }

    #[rstest]
    #[case(json!({"Name": "Olin Library"}), "Olin Library")]
    #[case(json!({"Name": "None"}), "")]
    #[case(json!({"Name": null}), "")]
    #[case(json!({}), "")]
    #[case(json!({"Name": 42}), "42")]
    #[case(json!({"Name": true}), "true")]
    #[case(json!({"Name": "none"}), "none")]
    fn names_fall_back_to_empty(#[case] value: Value, #[case] expected: &str) {
        assert_eq!(raw(value).name(), expected);
    }
}
