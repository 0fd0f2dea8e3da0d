use http::{HeaderMap, Method, StatusCode};
use hyper::body::Bytes;
use url::Url;

use crate::errors::{ProxyError, Result};

/// Upstream reply, collected in full before it is re-emitted.
#[derive(Debug)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Issue a single outbound request and collect the complete reply.
///
/// Transport-level failures (DNS, refused connections, resets) surface as
/// `UpstreamRequestFailed`; a non-2xx status is not an error here — the
/// caller relays it untouched. Nothing is retried, and no timeout is
/// applied beyond the client's own defaults.
pub async fn send_upstream(
    client: &reqwest::Client,
    method: Method,
    target: Url,
    headers: HeaderMap,
    body: Option<Bytes>,
) -> Result<UpstreamReply> {
    // Use the host as identifier for error messages
    let upstream_identifier = target.host_str().unwrap_or("<no-host>").to_string();

    let mut request = client.request(method, target).headers(headers);
    if let Some(bytes) = body {
        request = request.body(bytes);
    }

    let response = request.send().await.map_err(|e| {
        ProxyError::UpstreamRequestFailed(upstream_identifier.clone(), e.to_string())
    })?;

    let status = response.status();
    let headers = response.headers().clone();
    let body = response
        .bytes()
        .await
        .map_err(|e| ProxyError::ResponseBodyError(e.to_string()))?;

    Ok(UpstreamReply {
        status,
        headers,
        body,
    })
}
