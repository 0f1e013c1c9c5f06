//! Registered routes and the requests they are matched against.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use http::{HeaderMap, Method};
use url::Url;

use super::context::{MockedResponse, ResponseTransformer};

/// Produces a response for a matched request, or `None` to let the next
/// matching handler try.
pub type Resolver = Arc<dyn Fn(&MockRequest) -> Option<MockResponse> + Send + Sync>;

/// An incoming request as seen by resolvers.
#[derive(Debug, Clone)]
pub struct MockRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl MockRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Query string including the leading `?`, or empty.
    pub fn search(&self) -> String {
        search(&self.url)
    }
}

pub(crate) fn search(url: &Url) -> String {
    url.query().map(|query| format!("?{query}")).unwrap_or_default()
}

/// Strips query string and fragment.
pub fn route_url(url: &Url) -> Url {
    let mut route = url.clone();
    route.set_query(None);
    route.set_fragment(None);
    route
}

/// Whether a handler may answer more than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    /// Consumed after the first response.
    Once,
    Repeat,
}

/// What a resolver hands back: instructions plus the registration mode.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub mode: ResponseMode,
    pub transformers: Vec<ResponseTransformer>,
}

impl MockResponse {
    pub fn repeat(transformers: Vec<ResponseTransformer>) -> Self {
        Self {
            mode: ResponseMode::Repeat,
            transformers,
        }
    }

    pub fn once(transformers: Vec<ResponseTransformer>) -> Self {
        Self {
            mode: ResponseMode::Once,
            transformers,
        }
    }
}

/// How request URLs are compared with route URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Scheme, host, port and path must all match.
    #[default]
    Url,
    /// Only the path must match (replaying an archive under a different origin).
    Path,
}

/// A route registered with a mock server.
pub struct RequestHandler {
    method: Method,
    url: Url,
    resolver: Resolver,
    consumed: AtomicBool,
}

impl fmt::Debug for RequestHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestHandler")
            .field("method", &self.method)
            .field("url", &self.url.as_str())
            .field("consumed", &self.is_consumed())
            .finish_non_exhaustive()
    }
}

impl RequestHandler {
    pub fn new(method: Method, url: &Url, resolver: Resolver) -> Self {
        Self {
            method,
            url: route_url(url),
            resolver,
            consumed: AtomicBool::new(false),
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Route URL, without query string.
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed.load(Ordering::Acquire)
    }

    pub fn matches(&self, request: &MockRequest, mode: MatchMode) -> bool {
        if self.method != request.method {
            return false;
        }
        match mode {
            MatchMode::Url => route_url(&request.url) == self.url,
            MatchMode::Path => request.url.path() == self.url.path(),
        }
    }

    /// Runs the resolver unless this handler was already consumed.
    pub fn run(&self, request: &MockRequest) -> Option<MockedResponse> {
        if self.is_consumed() {
            return None;
        }
        let response = (self.resolver)(request)?;
        if response.mode == ResponseMode::Once
            && self
                .consumed
                .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                .is_err()
        {
            // Another request consumed it first.
            return None;
        }
        Some(MockedResponse::compose(response.transformers))
    }
}
