//! Points, geocoded locations and spherical-cap radius queries.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Mean Earth radius in miles used to turn a distance into an angle.
pub const EARTH_RADIUS_MILES: f64 = 3963.2;

/// Validation errors for coordinates and radius queries.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum GeoValidationError {
    #[error("longitude must be within -180..=180")]
    Longitude,
    #[error("latitude must be within -90..=90")]
    Latitude,
    #[error("distance must be a positive number of miles")]
    Distance,
}

/// WGS84 point stored as longitude/latitude degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    lng: f64,
    lat: f64,
}

impl GeoPoint {
    /// Validate and construct a point.
    pub fn new(lng: f64, lat: f64) -> Result<Self, GeoValidationError> {
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(GeoValidationError::Longitude);
        }
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(GeoValidationError::Latitude);
        }
        Ok(Self { lng, lat })
    }

    /// Longitude in degrees.
    pub const fn lng(&self) -> f64 {
        self.lng
    }

    /// Latitude in degrees.
    pub const fn lat(&self) -> f64 {
        self.lat
    }

    /// Central angle to `other` in radians (haversine form).
    pub fn angular_distance(&self, other: &GeoPoint) -> f64 {
        let (lat1, lat2) = (self.lat.to_radians(), other.lat.to_radians());
        let d_lat = lat2 - lat1;
        let d_lng = (other.lng - self.lng).to_radians();
        let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
        2.0 * h.sqrt().min(1.0).asin()
    }
}

/// Region within an angular radius of a centre point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphericalCap {
    center: GeoPoint,
    radius: f64,
}

impl SphericalCap {
    /// Build a cap from a ground distance in miles.
    pub fn from_miles(center: GeoPoint, distance_miles: f64) -> Result<Self, GeoValidationError> {
        if !distance_miles.is_finite() || distance_miles <= 0.0 {
            return Err(GeoValidationError::Distance);
        }
        Ok(Self {
            center,
            radius: distance_miles / EARTH_RADIUS_MILES,
        })
    }

    /// Centre of the cap.
    pub const fn center(&self) -> GeoPoint {
        self.center
    }

    /// Angular radius in radians.
    pub const fn radius(&self) -> f64 {
        self.radius
    }

    /// Whether `point` lies inside or on the cap boundary.
    pub fn contains(&self, point: &GeoPoint) -> bool {
        self.center.angular_distance(point) <= self.radius
    }
}

/// Geocoded address attached to a bootcamp.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub point: GeoPoint,
    pub formatted_address: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zipcode: String,
    pub country: String,
}

/// Wire form: `{"type": "Point", "coordinates": [lng, lat], ...}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationDto {
    #[serde(rename = "type")]
    #[schema(example = "Point")]
    pub kind: String,
    #[schema(example = json!([-71.104028, 42.350846]))]
    pub coordinates: [f64; 2],
    pub formatted_address: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zipcode: String,
    pub country: String,
}

impl From<Location> for LocationDto {
    fn from(value: Location) -> Self {
        Self {
            kind: "Point".to_owned(),
            coordinates: [value.point.lng(), value.point.lat()],
            formatted_address: value.formatted_address,
            street: value.street,
            city: value.city,
            state: value.state,
            zipcode: value.zipcode,
            country: value.country,
        }
    }
}

impl TryFrom<LocationDto> for Location {
    type Error = GeoValidationError;

    fn try_from(value: LocationDto) -> Result<Self, Self::Error> {
        let [lng, lat] = value.coordinates;
        Ok(Self {
            point: GeoPoint::new(lng, lat)?,
            formatted_address: value.formatted_address,
            street: value.street,
            city: value.city,
            state: value.state,
            zipcode: value.zipcode,
            country: value.country,
        })
    }
}

impl Serialize for Location {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        LocationDto::from(self.clone()).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Location {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let dto = LocationDto::deserialize(deserializer)?;
        Location::try_from(dto).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn point(lng: f64, lat: f64) -> GeoPoint {
        GeoPoint::new(lng, lat).expect("valid point")
    }

    #[rstest]
    #[case(181.0, 0.0, GeoValidationError::Longitude)]
    #[case(0.0, -91.0, GeoValidationError::Latitude)]
    #[case(f64::NAN, 0.0, GeoValidationError::Longitude)]
    fn rejects_out_of_range_points(
        #[case] lng: f64,
        #[case] lat: f64,
        #[case] expected: GeoValidationError,
    ) {
        assert_eq!(GeoPoint::new(lng, lat), Err(expected));
    }

    #[rstest]
    #[case(0.0)]
    #[case(-5.0)]
    #[case(f64::INFINITY)]
    #[case(f64::NAN)]
    fn rejects_non_positive_distance(#[case] miles: f64) {
        assert_eq!(
            SphericalCap::from_miles(point(0.0, 0.0), miles),
            Err(GeoValidationError::Distance)
        );
    }

    #[rstest]
    fn radius_is_distance_over_earth_radius() {
        let cap = SphericalCap::from_miles(point(0.0, 0.0), 3963.2).expect("valid cap");
        assert!((cap.radius() - 1.0).abs() < f64::EPSILON);
    }

    #[rstest]
    fn cap_contains_nearby_points_only() {
        // Boston to Cambridge is ~3 miles; Boston to New York ~190 miles.
        let boston = point(-71.0589, 42.3601);
        let cambridge = point(-71.1097, 42.3736);
        let new_york = point(-74.0060, 40.7128);
        let cap = SphericalCap::from_miles(boston, 10.0).expect("valid cap");

        assert!(cap.contains(&boston));
        assert!(cap.contains(&cambridge));
        assert!(!cap.contains(&new_york));
    }

    #[rstest]
    fn location_serialises_as_point() {
        let location = Location {
            point: point(-71.104028, 42.350846),
            formatted_address: "233 Bay State Rd, Boston, MA 02215-1405, US".into(),
            street: "233 Bay State Rd".into(),
            city: "Boston".into(),
            state: "MA".into(),
            zipcode: "02215-1405".into(),
            country: "US".into(),
        };
        let json = serde_json::to_value(&location).expect("serialise");
        assert_eq!(json["type"], "Point");
        assert_eq!(json["coordinates"], serde_json::json!([-71.104028, 42.350846]));
        assert_eq!(json["formattedAddress"], "233 Bay State Rd, Boston, MA 02215-1405, US");
    }
}
