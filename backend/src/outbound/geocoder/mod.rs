//! Geocoder outbound adapters.
//!
//! This module provides a thin HTTP implementation of the `Geocoder` port
//! for MapQuest-compatible providers.

mod dto;
mod http_geocoder;

pub use http_geocoder::HttpGeocoder;
