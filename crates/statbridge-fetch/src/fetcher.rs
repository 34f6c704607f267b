//! Source stats fetcher.
//!
//! Performs a single HTTP GET against the configured stats endpoint and
//! hands back the raw body. Anything other than a non-empty `200 OK` is
//! an error; there are no retries and no timeout beyond the transport
//! default.

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use http::uri::Scheme;
use http::{header, HeaderMap, Method, Request, StatusCode, Uri};
use http_body_util::{BodyExt, Empty};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Boxed future returned by [`StatsSource::fetch`].
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Maximum number of redirects followed before giving up.
pub const MAX_REDIRECTS: usize = 10;

const USER_AGENT: &str = concat!("statbridge/", env!("CARGO_PKG_VERSION"));

/// Errors that can occur while fetching the source payload.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid source url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected status: {0}")]
    Status(StatusCode),

    #[error("failed to read response body: {0}")]
    Body(String),

    #[error("empty response body")]
    EmptyBody,

    #[error("stopped after {0} redirects")]
    TooManyRedirects(usize),
}

/// Anything that can produce one raw stats payload per call.
///
/// The collector only depends on this trait, so tests can swap the
/// network for canned bodies.
pub trait StatsSource: Send + Sync {
    /// Fetch one full payload. Never returns a partial body.
    fn fetch(&self) -> BoxFuture<'_, Result<Bytes, FetchError>>;
}

/// HTTP implementation of [`StatsSource`] backed by a pooled hyper client.
#[derive(Clone)]
pub struct StatsFetcher {
    client: Client<HttpConnector, Empty<Bytes>>,
    url: Uri,
}

impl StatsFetcher {
    /// Create a fetcher for an absolute `http://` URL.
    pub fn new(url: &str) -> Result<Self, FetchError> {
        let invalid = |reason: &str| FetchError::InvalidUrl {
            url: url.to_string(),
            reason: reason.to_string(),
        };

        let uri: Uri = url.parse().map_err(|e: http::uri::InvalidUri| invalid(&e.to_string()))?;
        match uri.scheme() {
            Some(scheme) if *scheme == Scheme::HTTP => {}
            Some(_) => return Err(invalid("only http:// is supported")),
            None => return Err(invalid("url must be absolute")),
        }
        if uri.host().is_none() {
            return Err(invalid("missing host"));
        }

        let client = Client::builder(TokioExecutor::new()).build_http();
        Ok(Self { client, url: uri })
    }

    /// The configured source URL.
    pub fn url(&self) -> &Uri {
        &self.url
    }

    /// Issue one GET, following redirects, and return the full body.
    ///
    /// The response body is always drained, whatever the outcome, so the
    /// pooled connection can be reused.
    pub async fn fetch(&self) -> Result<Bytes, FetchError> {
        let mut uri = self.url.clone();

        for _ in 0..=MAX_REDIRECTS {
            let req = Request::builder()
                .method(Method::GET)
                .uri(uri.clone())
                .header(header::USER_AGENT, USER_AGENT)
                .body(Empty::<Bytes>::new())
                .map_err(|e| FetchError::Transport(e.to_string()))?;

            let resp = self.client.request(req).await.map_err(|e| {
                debug!(error = %e, %uri, "stats fetch failed");
                FetchError::Transport(e.to_string())
            })?;

            let status = resp.status();
            let next = is_followed_redirect(status)
                .then(|| redirect_target(&uri, resp.headers()))
                .flatten();

            let collected = resp.into_body().collect().await;

            if let Some(next) = next {
                debug!(%status, from = %uri, to = %next, "following redirect");
                uri = next;
                continue;
            }

            if status != StatusCode::OK {
                debug!(%status, %uri, "stats fetch non-200");
                return Err(FetchError::Status(status));
            }

            let body = collected
                .map_err(|e| FetchError::Body(e.to_string()))?
                .to_bytes();
            if body.is_empty() {
                return Err(FetchError::EmptyBody);
            }
            return Ok(body);
        }

        Err(FetchError::TooManyRedirects(MAX_REDIRECTS))
    }
}

impl StatsSource for StatsFetcher {
    fn fetch(&self) -> BoxFuture<'_, Result<Bytes, FetchError>> {
        Box::pin(StatsFetcher::fetch(self))
    }
}

fn is_followed_redirect(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::MOVED_PERMANENTLY
            | StatusCode::FOUND
            | StatusCode::SEE_OTHER
            | StatusCode::TEMPORARY_REDIRECT
            | StatusCode::PERMANENT_REDIRECT
    )
}

fn redirect_target(base: &Uri, headers: &HeaderMap) -> Option<Uri> {
    let location = headers.get(header::LOCATION)?.to_str().ok()?;
    resolve_location(base, location)
}

/// Resolve a `Location` header against the URI that produced it, per
/// RFC 3986 reference resolution.
///
/// Returns `None` for targets that cannot be fetched (non-http schemes,
/// empty or unparsable values).
fn resolve_location(base: &Uri, location: &str) -> Option<Uri> {
    let location = location.trim();
    if location.is_empty() {
        return None;
    }

    let base = Url::parse(&base.to_string()).ok()?;
    let mut target = base.join(location).ok()?;
    if target.scheme() != "http" || !target.has_host() {
        return None;
    }
    target.set_fragment(None);
    target.as_str().parse().ok()
}
