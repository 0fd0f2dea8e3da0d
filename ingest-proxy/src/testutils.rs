//! Local stand-in upstreams for exercising the forwarding path without
//! touching the real hosts.

use http::HeaderMap;
use http::header::CONTENT_TYPE;
use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto;
use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use url::Url;

/// A request as the mock upstream saw it.
#[derive(Clone, Debug)]
pub struct Recorded {
    pub method: String,
    pub uri: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Mock upstream that records every request and answers with a fixed
/// response.
pub struct MockUpstream {
    pub url: Url,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockUpstream {
    /// Number of requests that reached the upstream.
    pub fn hits(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn recorded(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

/// Start a recording upstream on an OS-assigned port.
pub async fn start_upstream(
    status: u16,
    body: &'static str,
    content_type: Option<&'static str>,
) -> MockUpstream {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock upstream");
    let port = listener.local_addr().expect("local addr").port();
    let requests: Arc<Mutex<Vec<Recorded>>> = Arc::default();

    let recorded = requests.clone();
    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                return;
            };
            let io = TokioIo::new(stream);
            let recorded = recorded.clone();

            tokio::spawn(async move {
                let service = service_fn(move |req: Request<Incoming>| {
                    let recorded = recorded.clone();
                    async move {
                        let (parts, inbound) = req.into_parts();
                        let bytes = inbound
                            .collect()
                            .await
                            .map(|collected| collected.to_bytes())
                            .unwrap_or_default();

                        recorded.lock().unwrap().push(Recorded {
                            method: parts.method.to_string(),
                            uri: parts.uri.to_string(),
                            headers: parts.headers,
                            body: bytes,
                        });

                        let mut response = Response::builder().status(status);
                        if let Some(value) = content_type {
                            response = response.header(CONTENT_TYPE, value);
                        }
                        Ok::<_, Infallible>(
                            response
                                .body(Full::new(Bytes::from_static(body.as_bytes())))
                                .unwrap(),
                        )
                    }
                });

                let _ = auto::Builder::new(TokioExecutor::new())
                    .serve_connection(io, service)
                    .await;
            });
        }
    });

    MockUpstream {
        url: Url::parse(&format!("http://127.0.0.1:{port}")).expect("mock upstream url"),
        requests,
    }
}

/// Start a listener that accepts connections and immediately drops them,
/// producing a transport-level failure on every attempt. Returns the URL
/// and the number of connection attempts observed.
pub async fn start_resetting_upstream() -> (Url, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind resetting upstream");
    let port = listener.local_addr().expect("local addr").port();
    let attempts = Arc::new(AtomicUsize::new(0));

    let counter = attempts.clone();
    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                return;
            };
            counter.fetch_add(1, Ordering::SeqCst);
            drop(stream);
        }
    });

    let url = Url::parse(&format!("http://127.0.0.1:{port}")).expect("resetting upstream url");
    (url, attempts)
}
