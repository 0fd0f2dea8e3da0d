//! CORS response policy.
//!
//! Every response the proxy emits carries a fixed, permissive header
//! triple so browser analytics clients on any origin can reach it. The
//! upstream's own CORS headers are never consulted; whatever it sends is
//! overwritten here.

use http::HeaderMap;
use http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    HeaderValue,
};

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_HEADERS: &str = "Content-Type, Authorization";

/// Method list a route advertises in its CORS headers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AllowedMethods {
    /// Wildcard ingest route: GET, POST and preflight.
    Ingest,
    /// Decide route: POST and preflight only.
    Decide,
}

impl AllowedMethods {
    pub const fn as_str(&self) -> &'static str {
        match self {
            AllowedMethods::Ingest => "GET, POST, OPTIONS",
            AllowedMethods::Decide => "POST, OPTIONS",
        }
    }
}

/// Overwrites the Access-Control-* triple on `headers`.
pub fn apply(headers: &mut HeaderMap, methods: AllowedMethods) {
    headers.insert(
        ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static(ALLOW_ORIGIN),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(methods.as_str()),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
}
