//! Fixed-route decide proxy: `POST|OPTIONS /ingest/decide`.
//!
//! Unlike the wildcard route this one always targets a single upstream
//! path, treats bodies as text, and forces the JSON content type in both
//! directions.

use http::header::{CONTENT_TYPE, USER_AGENT};
use http::{HeaderMap, HeaderValue, Method, StatusCode};
use http_body_util::combinators::BoxBody;
use hyper::Response;
use hyper::body::Bytes;
use shared::http::full_body;

use crate::ProxyState;
use crate::cors::{self, AllowedMethods};
use crate::errors::{ProxyError, Result};
use crate::forward::send_upstream;
use crate::metrics_defs::{REQUESTS_RELAYED, UPSTREAM_ERRORS, UPSTREAM_NON_2XX};

/// Static body of the fixed 500 returned on transport failures.
const FAILURE_MESSAGE: &str = "PostHog decide proxy failed\n";

/// User-Agent sent upstream when the caller does not provide one.
pub const FALLBACK_USER_AGENT: &str = "beacon-proxy/1.0";

pub(crate) async fn post(
    state: &ProxyState,
    query: Option<&str>,
    headers: &HeaderMap,
    body: Bytes,
) -> Result<Response<BoxBody<Bytes, ProxyError>>> {
    let target = state.targets.decide_url(query);
    tracing::debug!(url = %target, "POST proxy /decide");
    shared::counter!(REQUESTS_RELAYED, "route" => "decide").increment(1);

    let text = String::from_utf8_lossy(&body).into_owned();

    let mut outbound = HeaderMap::new();
    outbound.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    outbound.insert(
        USER_AGENT,
        headers
            .get(USER_AGENT)
            .cloned()
            .unwrap_or_else(|| HeaderValue::from_static(FALLBACK_USER_AGENT)),
    );

    let reply = match send_upstream(
        &state.client,
        Method::POST,
        target,
        outbound,
        Some(Bytes::from(text)),
    )
    .await
    {
        Ok(reply) => reply,
        Err(err) => {
            tracing::error!(error = %err, "decide proxy request failed");
            shared::counter!(UPSTREAM_ERRORS, "route" => "decide").increment(1);

            let mut response = Response::new(full_body(FAILURE_MESSAGE));
            *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            return Ok(response);
        }
    };

    tracing::debug!(status = %reply.status, "decide upstream responded");
    if !reply.status.is_success() {
        tracing::warn!(status = %reply.status, "decide upstream responded non-2xx");
        shared::counter!(UPSTREAM_NON_2XX, "route" => "decide").increment(1);
    }

    let text_body = String::from_utf8_lossy(&reply.body).into_owned();

    let mut response = Response::builder()
        .status(reply.status)
        .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
        .body(full_body(text_body))
        .map_err(|e| ProxyError::InternalError(format!("Failed to build response: {e}")))?;
    cors::apply(response.headers_mut(), AllowedMethods::Decide);

    Ok(response)
}

/// Preflight short-circuit; only POST is advertised alongside OPTIONS.
pub(crate) fn options() -> Response<BoxBody<Bytes, ProxyError>> {
    let mut response = Response::new(full_body(Bytes::new()));
    cors::apply(response.headers_mut(), AllowedMethods::Decide);
    response
}
