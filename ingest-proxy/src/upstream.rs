//! Upstream target resolution.
//!
//! The proxy fronts exactly two hosts: the ingestion host receiving event
//! payloads and the assets host serving the static analytics library.
//! Which one a request targets is a pure function of its wildcard path,
//! decided once per request with no other input.

use url::Url;

/// Primary ingestion host receiving event payloads.
pub const INGEST_HOST: &str = "https://us.i.posthog.com";

/// Host serving the static analytics-library assets.
pub const ASSETS_HOST: &str = "https://us-assets.i.posthog.com";

/// Upstream path of the feature-flag negotiation endpoint.
pub const DECIDE_PATH: &str = "/decide";

/// True when `path` addresses a static analytics asset.
///
/// Total over all paths: everything else goes to the ingestion host.
pub fn is_asset_path(path: &str) -> bool {
    path.starts_with("static/")
}

/// The pair of upstream base URLs, built once at startup and immutable
/// while requests are processed.
#[derive(Clone, Debug)]
pub struct Targets {
    ingest: Url,
    assets: Url,
}

impl Targets {
    pub fn new() -> Self {
        Self {
            ingest: Url::parse(INGEST_HOST).expect("ingest host literal"),
            assets: Url::parse(ASSETS_HOST).expect("assets host literal"),
        }
    }

    /// Base URL pair for tests that stand in local listeners for the real
    /// hosts.
    pub(crate) fn with_hosts(ingest: Url, assets: Url) -> Self {
        Self { ingest, assets }
    }

    /// Target URL for a wildcard ingest path. The path is forwarded
    /// unmodified (including the `static/` prefix when present), and the
    /// query string is carried over unchanged.
    pub fn ingest_url(&self, path: &str, query: Option<&str>) -> Url {
        let base = if is_asset_path(path) {
            &self.assets
        } else {
            &self.ingest
        };

        let mut url = base.clone();
        url.set_path(path);
        url.set_query(query);
        url
    }

    /// Target URL for the decide endpoint, with the inbound query string
    /// carried over unchanged.
    pub fn decide_url(&self, query: Option<&str>) -> Url {
        let mut url = self.ingest.clone();
        url.set_path(DECIDE_PATH);
        url.set_query(query);
        url
    }
}

impl Default for Targets {
    fn default() -> Self {
        Self::new()
    }
}
