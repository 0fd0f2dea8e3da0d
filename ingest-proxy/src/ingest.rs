//! Wildcard ingest route: `GET|POST|OPTIONS /ingest/<path>`.
//!
//! One parameterized handler serves both header-forwarding variants; the
//! `forward_extra_headers` option controls whether `Accept-Encoding` and
//! `Accept-Language` travel upstream alongside `User-Agent` and `Accept`.

use http::header::{
    ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, CACHE_CONTROL, CONTENT_TYPE, USER_AGENT,
};
use http::{HeaderMap, HeaderValue, Method, StatusCode};
use http_body_util::combinators::BoxBody;
use hyper::Response;
use hyper::body::Bytes;
use shared::http::full_body;

use crate::ProxyState;
use crate::cors::{self, AllowedMethods};
use crate::errors::{ProxyError, Result};
use crate::forward::{UpstreamReply, send_upstream};
use crate::metrics_defs::{REQUESTS_RELAYED, UPSTREAM_ERRORS, UPSTREAM_NON_2XX};

/// Static body of the fixed 500 returned on transport failures.
const FAILURE_MESSAGE: &str = "PostHog proxy failed\n";

const DEFAULT_ACCEPT: &str = "*/*";

pub(crate) async fn get(
    state: &ProxyState,
    path: &str,
    query: Option<&str>,
    headers: &HeaderMap,
) -> Result<Response<BoxBody<Bytes, ProxyError>>> {
    let target = state.targets.ingest_url(path, query);
    tracing::debug!(url = %target, "GET proxy");
    shared::counter!(REQUESTS_RELAYED, "route" => "ingest").increment(1);

    let outbound = outbound_headers(state, headers);
    let reply = match send_upstream(&state.client, Method::GET, target, outbound, None).await {
        Ok(reply) => reply,
        Err(err) => return Ok(failure_response(err)),
    };

    log_relayed_status(&reply);

    let content_type = header_or(&reply.headers, CONTENT_TYPE, "application/octet-stream");
    let cache_control = header_or(&reply.headers, CACHE_CONTROL, "no-cache");

    let mut response = Response::builder()
        .status(reply.status)
        .header(CONTENT_TYPE, content_type)
        .header(CACHE_CONTROL, cache_control)
        .body(full_body(reply.body))
        .map_err(|e| ProxyError::InternalError(format!("Failed to build response: {e}")))?;
    cors::apply(response.headers_mut(), AllowedMethods::Ingest);

    Ok(response)
}

pub(crate) async fn post(
    state: &ProxyState,
    path: &str,
    query: Option<&str>,
    headers: &HeaderMap,
    body: Bytes,
) -> Result<Response<BoxBody<Bytes, ProxyError>>> {
    let target = state.targets.ingest_url(path, query);
    tracing::debug!(url = %target, "POST proxy");
    shared::counter!(REQUESTS_RELAYED, "route" => "ingest").increment(1);

    let mut outbound = outbound_headers(state, headers);
    outbound.insert(
        CONTENT_TYPE,
        header_or(headers, CONTENT_TYPE, "application/json"),
    );

    let reply =
        match send_upstream(&state.client, Method::POST, target, outbound, Some(body)).await {
            Ok(reply) => reply,
            Err(err) => return Ok(failure_response(err)),
        };

    log_relayed_status(&reply);

    let content_type = header_or(&reply.headers, CONTENT_TYPE, "application/json");

    let mut response = Response::builder()
        .status(reply.status)
        .header(CONTENT_TYPE, content_type)
        .body(full_body(reply.body))
        .map_err(|e| ProxyError::InternalError(format!("Failed to build response: {e}")))?;
    cors::apply(response.headers_mut(), AllowedMethods::Ingest);

    Ok(response)
}

/// Preflight short-circuit: answered locally, the upstream is never
/// contacted.
pub(crate) fn options() -> Response<BoxBody<Bytes, ProxyError>> {
    let mut response = Response::new(full_body(Bytes::new()));
    cors::apply(response.headers_mut(), AllowedMethods::Ingest);
    response
}

/// Headers forwarded upstream on every ingest request.
fn outbound_headers(state: &ProxyState, inbound: &HeaderMap) -> HeaderMap {
    let mut outbound = HeaderMap::new();
    outbound.insert(USER_AGENT, header_or(inbound, USER_AGENT, ""));
    outbound.insert(ACCEPT, header_or(inbound, ACCEPT, DEFAULT_ACCEPT));

    if state.forward_extra_headers {
        for name in [ACCEPT_ENCODING, ACCEPT_LANGUAGE] {
            if let Some(value) = inbound.get(&name) {
                outbound.insert(name, value.clone());
            }
        }
    }

    outbound
}

fn header_or(
    headers: &HeaderMap,
    name: http::header::HeaderName,
    fallback: &'static str,
) -> HeaderValue {
    headers
        .get(&name)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static(fallback))
}

fn log_relayed_status(reply: &UpstreamReply) {
    if !reply.status.is_success() {
        tracing::warn!(status = %reply.status, "upstream responded non-2xx");
        shared::counter!(UPSTREAM_NON_2XX, "route" => "ingest").increment(1);
    }
}

fn failure_response(err: ProxyError) -> Response<BoxBody<Bytes, ProxyError>> {
    tracing::error!(error = %err, "proxy request failed");
    shared::counter!(UPSTREAM_ERRORS, "route" => "ingest").increment(1);

    let mut response = Response::new(full_body(FAILURE_MESSAGE));
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response
}
