//! Request dispatch for the proxy listener.
//!
//! Two routes exist under the `/ingest` prefix: the fixed `decide`
//! endpoint and the wildcard passthrough. `decide` is matched first so it
//! never falls into the wildcard.

use http_body_util::BodyExt;
use http_body_util::combinators::BoxBody;
use hyper::body::Bytes;
use hyper::{Method, Request, Response, StatusCode};
use shared::http::{full_body, make_boxed_error_response};
use std::sync::Arc;

use crate::errors::{ProxyError, Result};
use crate::{ProxyState, decide, ingest};

/// Matches incoming requests against the proxy routes
#[derive(Clone)]
pub struct Router {
    state: Arc<ProxyState>,
}

impl Router {
    pub(crate) fn new(state: Arc<ProxyState>) -> Self {
        Self { state }
    }

    /// Routes an incoming request to the appropriate handler
    pub async fn route<B>(&self, req: Request<B>) -> Result<Response<BoxBody<Bytes, ProxyError>>>
    where
        B: hyper::body::Body + Send + 'static,
        B::Error: std::error::Error,
    {
        let path = req.uri().path().to_owned();
        let Some(rest) = ingest_path(&path) else {
            tracing::warn!(
                method = %req.method(),
                path = %path,
                "No route matched"
            );
            return Ok(no_route_response());
        };
        let rest = rest.to_owned();

        if rest == "decide" {
            if req.method() == Method::POST {
                let (parts, body) = req.into_parts();
                let bytes = collect_body(body).await?;
                decide::post(&self.state, parts.uri.query(), &parts.headers, bytes).await
            } else if req.method() == Method::OPTIONS {
                Ok(decide::options())
            } else {
                Ok(make_boxed_error_response(StatusCode::METHOD_NOT_ALLOWED))
            }
        } else if req.method() == Method::GET {
            let (parts, _body) = req.into_parts();
            ingest::get(&self.state, &rest, parts.uri.query(), &parts.headers).await
        } else if req.method() == Method::POST {
            let (parts, body) = req.into_parts();
            let bytes = collect_body(body).await?;
            ingest::post(&self.state, &rest, parts.uri.query(), &parts.headers, bytes).await
        } else if req.method() == Method::OPTIONS {
            Ok(ingest::options())
        } else {
            Ok(make_boxed_error_response(StatusCode::METHOD_NOT_ALLOWED))
        }
    }
}

/// Wildcard path under the `/ingest` prefix, or None when the request is
/// outside the proxy surface. `/ingest` and `/ingest/` both map to the
/// empty wildcard.
fn ingest_path(path: &str) -> Option<&str> {
    match path.strip_prefix("/ingest") {
        Some("") => Some(""),
        Some(rest) => rest.strip_prefix('/'),
        None => None,
    }
}

async fn collect_body<B>(body: B) -> Result<Bytes>
where
    B: hyper::body::Body,
    B::Error: std::error::Error,
{
    body.collect()
        .await
        .map(|collected| collected.to_bytes())
        .map_err(|e| ProxyError::RequestBodyError(e.to_string()))
}

fn no_route_response() -> Response<BoxBody<Bytes, ProxyError>> {
    let mut response = Response::new(full_body("No route matched\n"));
    *response.status_mut() = StatusCode::NOT_FOUND;
    response
}
