//! Port resolving free-form addresses and zipcodes to locations.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::{GeoPoint, Location};

use super::define_port_error;

define_port_error! {
    /// Errors raised by geocoder adapters.
    pub enum GeocoderError {
        /// The provider returned no usable match.
        NoMatch { query: String } =>
            "no geocoding match for {query}",
        /// The provider could not be reached or rejected the call.
        Transport { message: String } =>
            "geocoder request failed: {message}",
        /// The provider response could not be interpreted.
        Decode { message: String } =>
            "geocoder response invalid: {message}",
    }
}

/// Port for forward geocoding.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve an address or zipcode to the best matching location.
    async fn geocode(&self, query: &str) -> Result<Location, GeocoderError>;
}

/// Deterministic geocoder for tests and offline development.
///
/// Known queries resolve to their registered location; anything else
/// resolves to the fallback location, when one is set.
#[derive(Debug, Clone, Default)]
pub struct FixtureGeocoder {
    known: HashMap<String, Location>,
    fallback: Option<Location>,
}

impl FixtureGeocoder {
    /// Geocoder that knows nothing and has no fallback.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `location` as the answer for `query`.
    #[must_use]
    pub fn with_location(mut self, query: impl Into<String>, location: Location) -> Self {
        self.known.insert(query.into(), location);
        self
    }

    /// Answer unknown queries with `location`.
    #[must_use]
    pub fn with_fallback(mut self, location: Location) -> Self {
        self.fallback = Some(location);
        self
    }

    /// Minimal location at `point` labelled with `city` and `zipcode`.
    pub fn location_at(point: GeoPoint, city: &str, zipcode: &str) -> Location {
        Location {
            point,
            formatted_address: format!("{city}, {zipcode}"),
            street: String::new(),
            city: city.to_owned(),
            state: String::new(),
            zipcode: zipcode.to_owned(),
            country: "US".to_owned(),
        }
    }
}

#[async_trait]
impl Geocoder for FixtureGeocoder {
    async fn geocode(&self, query: &str) -> Result<Location, GeocoderError> {
        self.known
            .get(query.trim())
            .or(self.fallback.as_ref())
            .cloned()
            .ok_or_else(|| GeocoderError::no_match(query))
    }
}
