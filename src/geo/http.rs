//! HTTP geolocation client for ipapi.co-shaped endpoints.
//!
//! Issues an unauthenticated `GET {base}/{ip}/json/` and reads `city` and
//! `country_name` from the body. Non-routable addresses are rejected
//! without a request since the endpoint cannot place them.

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::{GeoLocator, format_location};
use crate::error::ActivityError;

#[derive(Debug, Deserialize)]
struct GeoResponse {
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    country_name: Option<String>,
    #[serde(default)]
    error: bool,
    #[serde(default)]
    reason: Option<String>,
}

/// reqwest-backed [`GeoLocator`].
#[derive(Debug, Clone)]
pub struct HttpGeoLocator {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGeoLocator {
    /// Builds a locator against `base_url` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityError::Internal`] if the HTTP client cannot be
    /// constructed.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ActivityError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("storefront-activity/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ActivityError::Internal(format!("geo client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl GeoLocator for HttpGeoLocator {
    async fn locate(&self, ip: IpAddr) -> Result<String, ActivityError> {
        if !is_routable(ip) {
            return Err(ActivityError::GeoLookup(format!("{ip} is not routable")));
        }

        let url = format!("{}/{ip}/json/", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ActivityError::GeoLookup(e.to_string()))?
            .error_for_status()
            .map_err(|e| ActivityError::GeoLookup(e.to_string()))?;

        let body: GeoResponse = response
            .json()
            .await
            .map_err(|e| ActivityError::GeoLookup(e.to_string()))?;

        if body.error {
            return Err(ActivityError::GeoLookup(
                body.reason.unwrap_or_else(|| "lookup rejected".to_string()),
            ));
        }

        format_location(body.city.as_deref(), body.country_name.as_deref())
            .ok_or_else(|| ActivityError::GeoLookup("response lacked city or country".to_string()))
    }
}

/// Returns `false` for loopback, private, link-local, and other addresses
/// a public lookup service cannot place.
fn is_routable(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            !(v4.is_private()
                || v4.is_loopback()
                || v4.is_link_local()
                || v4.is_unspecified()
                || v4.is_broadcast()
                || v4.is_documentation())
        }
        IpAddr::V6(v6) => {
            !(v6.is_loopback()
                || v6.is_unspecified()
                || v6.is_unique_local()
                || v6.is_unicast_link_local())
        }
    }
}
