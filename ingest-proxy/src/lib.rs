pub mod config;
pub mod cors;
mod decide;
pub mod errors;
mod forward;
mod ingest;
pub mod metrics_defs;
pub mod router;
#[cfg(test)]
mod testutils;
pub mod upstream;

use http_body_util::combinators::BoxBody;
use hyper::body::{Bytes, Incoming};
use hyper::service::Service;
use hyper::{Request, Response};
use shared::admin_service::AdminService;
use shared::http::run_http_service;
use std::pin::Pin;
use std::sync::Arc;

use crate::errors::ProxyError;
use crate::router::Router;
use crate::upstream::Targets;

/// Dependencies shared by all handlers: the outbound HTTP client, the
/// resolved upstream base URLs and the handler options.
pub(crate) struct ProxyState {
    pub(crate) client: reqwest::Client,
    pub(crate) targets: Targets,
    pub(crate) forward_extra_headers: bool,
}

/// Runs the proxy and admin listeners until the process is stopped.
pub async fn run(config: config::Config) -> Result<(), ProxyError> {
    let client = reqwest::Client::builder()
        .build()
        .map_err(|e| ProxyError::InternalError(format!("Failed to build HTTP client: {e}")))?;

    let state = Arc::new(ProxyState {
        client,
        targets: Targets::new(),
        forward_extra_headers: config.forward_extra_headers,
    });
    let service = ProxyService {
        router: Router::new(state),
    };

    let admin = config.admin_listener;
    tokio::spawn(async move {
        let admin_service = AdminService::<_, ProxyError>::new(|| true);
        if let Err(err) = run_http_service(&admin.host, admin.port, admin_service).await {
            tracing::error!(error = %err, "admin listener failed");
        }
    });

    tracing::info!(
        host = %config.listener.host,
        port = config.listener.port,
        "ingest proxy listening"
    );
    run_http_service(&config.listener.host, config.listener.port, service).await
}

struct ProxyService {
    router: Router,
}

impl Service<Request<Incoming>> for ProxyService {
    type Response = Response<BoxBody<Bytes, ProxyError>>;
    type Error = ProxyError;
    type Future =
        Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'static>>;

    fn call(&self, req: Request<Incoming>) -> Self::Future {
        let router = self.router.clone();
        Box::pin(async move { router.route(req).await })
    }
}
