//! Reqwest-backed geocoder adapter.
//!
//! Issues one `GET {endpoint}?key=..&location=..` per lookup and keeps the
//! first location of the first result.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;
use zeroize::Zeroizing;

use super::dto::GeocodeResponseDto;
use crate::domain::Location;
use crate::domain::ports::{Geocoder, GeocoderError};

const DEFAULT_USER_AGENT: &str = "bootcamp-directory-geocoder/0.1";

/// Geocoder adapter bound to one provider endpoint and API key.
pub struct HttpGeocoder {
    client: Client,
    endpoint: Url,
    api_key: Zeroizing<String>,
}

impl HttpGeocoder {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, api_key: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            endpoint,
            api_key: Zeroizing::new(api_key),
        })
    }
}

#[async_trait]
impl Geocoder for HttpGeocoder {
    async fn geocode(&self, query: &str) -> Result<Location, GeocoderError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[("key", self.api_key.as_str()), ("location", query)])
            .send()
            .await
            .map_err(|error| GeocoderError::transport(error.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| GeocoderError::transport(error.to_string()))?;
        if !status.is_success() {
            return Err(map_status_error(status));
        }
        debug!(bytes = body.len(), "geocoder response received");
        parse_location(query, body.as_ref())
    }
}

fn parse_location(query: &str, body: &[u8]) -> Result<Location, GeocoderError> {
    let decoded: GeocodeResponseDto = serde_json::from_slice(body).map_err(|error| {
        GeocoderError::decode(format!("invalid geocoder JSON payload: {error}"))
    })?;
    decoded
        .into_best_location()
        .ok_or_else(|| GeocoderError::no_match(query))?
        .map_err(GeocoderError::decode)
}

fn map_status_error(status: StatusCode) -> GeocoderError {
    GeocoderError::transport(format!("status {}", status.as_u16()))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network decoding helpers.

    use super::*;
    use rstest::rstest;

    const BOSTON: &str = r#"{
        "results": [{
            "locations": [{
                "street": "233 Bay State Rd",
                "adminArea5": "Boston",
                "adminArea3": "MA",
                "adminArea1": "US",
                "postalCode": "02215-1405",
                "latLng": { "lat": 42.350846, "lng": -71.104028 }
            }]
        }]
    }"#;

    #[rstest]
    fn decodes_first_location() {
        let location = parse_location("233 Bay State Rd", BOSTON.as_bytes()).expect("decodes");
        assert_eq!(location.city, "Boston");
        assert_eq!(location.zipcode, "02215-1405");
        assert_eq!(location.point.lng(), -71.104028);
        assert_eq!(
            location.formatted_address,
            "233 Bay State Rd, Boston, MA 02215-1405, US"
        );
    }

    #[rstest]
    #[case(r#"{"results": []}"#)]
    #[case(r#"{"results": [{"locations": []}]}"#)]
    fn empty_results_are_no_match(#[case] body: &str) {
        let error = parse_location("nowhere", body.as_bytes()).expect_err("no match");
        assert_eq!(error, GeocoderError::no_match("nowhere"));
    }

    #[rstest]
    #[case("not json")]
    #[case(r#"{"results": [{"locations": [{"latLng": {"lat": 95.0, "lng": 0.0}}]}]}"#)]
    fn malformed_payloads_are_decode_errors(#[case] body: &str) {
        let error = parse_location("x", body.as_bytes()).expect_err("decode failure");
        assert!(matches!(error, GeocoderError::Decode { .. }));
    }

    #[rstest]
    fn non_success_status_is_transport_error() {
        assert!(matches!(
            map_status_error(StatusCode::FORBIDDEN),
            GeocoderError::Transport { .. }
        ));
    }
}
