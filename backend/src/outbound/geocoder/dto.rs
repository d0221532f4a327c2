//! DTOs for decoding MapQuest-style geocoding responses.

use serde::Deserialize;

use crate::domain::{GeoPoint, Location};

#[derive(Debug, Deserialize)]
pub(super) struct GeocodeResponseDto {
    #[serde(default)]
    pub(super) results: Vec<GeocodeResultDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct GeocodeResultDto {
    #[serde(default)]
    pub(super) locations: Vec<GeocodeLocationDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GeocodeLocationDto {
    #[serde(default)]
    pub(super) street: String,
    /// City.
    #[serde(default, rename = "adminArea5")]
    pub(super) city: String,
    /// State code.
    #[serde(default, rename = "adminArea3")]
    pub(super) state: String,
    /// Country code.
    #[serde(default, rename = "adminArea1")]
    pub(super) country: String,
    #[serde(default)]
    pub(super) postal_code: String,
    pub(super) lat_lng: LatLngDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct LatLngDto {
    pub(super) lat: f64,
    pub(super) lng: f64,
}

impl GeocodeResponseDto {
    /// Best match, or `None` when the provider found nothing.
    pub(super) fn into_best_location(self) -> Option<Result<Location, String>> {
        self.results
            .into_iter()
            .flat_map(|result| result.locations)
            .next()
            .map(GeocodeLocationDto::into_location)
    }
}

impl GeocodeLocationDto {
    fn into_location(self) -> Result<Location, String> {
        let point = GeoPoint::new(self.lat_lng.lng, self.lat_lng.lat)
            .map_err(|error| format!("provider returned an invalid point: {error}"))?;
        let state_zip = [self.state.as_str(), self.postal_code.as_str()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        let formatted_address = [
            self.street.as_str(),
            self.city.as_str(),
            state_zip.as_str(),
            self.country.as_str(),
        ]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
        Ok(Location {
            point,
            formatted_address,
            street: self.street,
            city: self.city,
            state: self.state,
            zipcode: self.postal_code,
            country: self.country,
        })
    }
}
