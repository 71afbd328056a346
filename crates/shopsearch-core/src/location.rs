//! The user's stored location, as handed over by external state management.
//!
//! Every field may be absent. Nothing here validates or fills in values; the
//! fallback rules live in [`crate::query_args::build_query_args`].

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLocationProfile {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country_id: Option<String>,
    #[serde(default)]
    pub country_name: Option<String>,
    #[serde(default)]
    pub street_address: Option<String>,
    #[serde(default)]
    pub postcode: Option<String>,
    /// House number. Kept as text: values like `"12b"` are common.
    #[serde(default)]
    pub house: Option<String>,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
}

/// A stored coordinate pair. Components are independently optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub lat: Option<f64>,
    /// Label describing what kind of point this is (e.g. `"Point"`).
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl UserLocationProfile {
    /// Profile with only a city and a coordinate pair set.
    #[must_use]
    pub fn at(city: &str, lng: f64, lat: f64) -> Self {
        Self {
            city: Some(city.to_owned()),
            coordinates: Some(Coordinates {
                lng: Some(lng),
                lat: Some(lat),
                kind: None,
            }),
            ..Self::default()
        }
    }
}
