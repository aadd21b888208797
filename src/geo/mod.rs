//! Best-effort IP geolocation.
//!
//! [`GeoLocator`] turns a client IP into a `"City, Country"` string.
//! [`resolve_location`] is what the recorder calls: it never fails and
//! substitutes [`UNKNOWN_LOCATION`] for every error, including a missing IP.

pub mod http;

use std::fmt;
use std::net::IpAddr;

use async_trait::async_trait;

use crate::domain::UNKNOWN_LOCATION;
use crate::error::ActivityError;

pub use http::HttpGeoLocator;

/// Resolves an IP address to a human-readable location.
#[async_trait]
pub trait GeoLocator: Send + Sync + fmt::Debug {
    /// Returns `"City, Country"` for `ip`.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityError::GeoLookup`] when the location cannot be
    /// determined for any reason.
    async fn locate(&self, ip: IpAddr) -> Result<String, ActivityError>;
}

/// Locator used when lookups are switched off; always fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledGeoLocator;

#[async_trait]
impl GeoLocator for DisabledGeoLocator {
    async fn locate(&self, _ip: IpAddr) -> Result<String, ActivityError> {
        Err(ActivityError::GeoLookup("geolocation disabled".to_string()))
    }
}

/// Looks up `ip`, falling back to [`UNKNOWN_LOCATION`] on any failure.
pub async fn resolve_location(locator: &dyn GeoLocator, ip: Option<IpAddr>) -> String {
    let Some(ip) = ip else {
        return UNKNOWN_LOCATION.to_string();
    };
    match locator.locate(ip).await {
        Ok(location) => location,
        Err(e) => {
            tracing::debug!(%ip, error = %e, "geolocation failed, using placeholder");
            UNKNOWN_LOCATION.to_string()
        }
    }
}

/// Builds `"City, Country"`. Both parts must be present and non-blank.
#[must_use]
pub fn format_location(city: Option<&str>, country: Option<&str>) -> Option<String> {
    let city = city.map(str::trim).filter(|s| !s.is_empty())?;
    let country = country.map(str::trim).filter(|s| !s.is_empty())?;
    Some(format!("{city}, {country}"))
}
