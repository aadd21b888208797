//! Request extractors for caller identity and client context.

use std::net::{IpAddr, SocketAddr};

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::HeaderMap;
use axum::http::request::Parts;

use crate::domain::{ClientContext, UserId};
use crate::error::ActivityError;

/// Header carrying the authenticated user id, set by the fronting auth
/// proxy.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Header carrying the original client address behind a proxy.
///
/// Trusted as-is, like [`USER_ID_HEADER`]: the fronting proxy must strip any
/// client-supplied value and set its own.
pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

/// The authenticated caller, read from [`USER_ID_HEADER`].
///
/// Rejects with [`ActivityError::Unauthenticated`] when the header is
/// missing or blank.
#[derive(Debug, Clone)]
pub struct CallerId(pub UserId);

impl<S> FromRequestParts<S> for CallerId
where
    S: Send + Sync,
{
    type Rejection = ActivityError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| Self(UserId::from(v)))
            .ok_or(ActivityError::Unauthenticated)
    }
}

impl<S> FromRequestParts<S> for ClientContext
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());
        Ok(client_context(&parts.headers, peer))
    }
}

/// Builds a [`ClientContext`] from request headers and the peer address.
///
/// The first parsable `x-forwarded-for` entry wins over the peer address.
/// That entry is only as trustworthy as the proxy in front of this service:
/// exposed directly, a client can send any address and pick the location
/// recorded for its events. Deployments must have the proxy overwrite the
/// header, the same requirement as for `x-user-id`.
#[must_use]
pub fn client_context(headers: &HeaderMap, peer: Option<IpAddr>) -> ClientContext {
    let forwarded = headers
        .get(FORWARDED_FOR_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|first| first.trim().parse::<IpAddr>().ok());

    let user_agent = headers
        .get(axum::http::header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    ClientContext {
        ip: forwarded.or(peer),
        user_agent,
    }
}
