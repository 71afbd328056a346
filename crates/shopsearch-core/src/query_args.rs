//! Query arguments for the merchant search.
//!
//! A search either matches merchants by name or, when the search text is
//! blank, lists merchants near the user's stored location. [`SearchQueryArgs`]
//! carries a [`GeoLocation`] exactly when its name is blank; the fields are
//! private so the only way to build one is [`build_query_args`].

use serde::Serialize;

use crate::location::UserLocationProfile;

/// Arguments sent to the query-execution capability.
///
/// Serializes to `{"searchName": ...}` for name searches and to
/// `{"searchName": ..., "geoLocation": {...}}` for location searches.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQueryArgs {
    search_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    geo_location: Option<GeoLocation>,
}

impl SearchQueryArgs {
    /// The search text, exactly as typed (untrimmed).
    #[must_use]
    pub fn search_name(&self) -> &str {
        &self.search_name
    }

    /// Location scope. `Some` iff [`Self::search_name`] is blank.
    #[must_use]
    pub fn geo_location(&self) -> Option<&GeoLocation> {
        self.geo_location.as_ref()
    }

    #[must_use]
    pub fn is_location_search(&self) -> bool {
        self.geo_location.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoLocation {
    pub city: String,
    pub country_id: String,
    pub country_name: String,
    pub street_address: String,
    pub postcode: String,
    pub house: String,
    pub loc: GeoPoint,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoPoint {
    #[serde(rename = "type")]
    pub kind: String,
    /// `[longitude, latitude]`.
    pub coordinates: [f64; 2],
}

impl GeoLocation {
    /// Resolves every field of a possibly partial profile.
    ///
    /// Missing text fields become `""`, missing or non-finite coordinate
    /// components become `0.0`, and the pair is always `[lng, lat]`.
    #[must_use]
    pub fn from_profile(profile: &UserLocationProfile) -> Self {
        let text = |field: &Option<String>| field.clone().unwrap_or_default();
        let component = |value: Option<f64>| value.filter(|v| v.is_finite()).unwrap_or(0.0);

        let coords = profile.coordinates.as_ref();
        let lng = component(coords.and_then(|c| c.lng));
        let lat = component(coords.and_then(|c| c.lat));
        let kind = coords.and_then(|c| c.kind.clone()).unwrap_or_default();

        Self {
            city: text(&profile.city),
            country_id: text(&profile.country_id),
            country_name: text(&profile.country_name),
            street_address: text(&profile.street_address),
            postcode: text(&profile.postcode),
            house: text(&profile.house),
            loc: GeoPoint {
                kind,
                coordinates: [lng, lat],
            },
        }
    }
}

/// `true` when `text` has no non-whitespace characters.
#[must_use]
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Builds the arguments for one dispatch.
///
/// Non-blank text produces a name search. Blank text produces a location
/// search scoped by `profile`. The text is passed through as-is in both cases.
#[must_use]
pub fn build_query_args(text: &str, profile: &UserLocationProfile) -> SearchQueryArgs {
    let geo_location = is_blank(text).then(|| GeoLocation::from_profile(profile));
    SearchQueryArgs {
        search_name: text.to_owned(),
        geo_location,
    }
}
