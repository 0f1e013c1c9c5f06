//! Route builder and server traits, plus an in-memory implementation.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use http::Method;
use url::Url;

use super::context::MockedResponse;
use super::handler::{MatchMode, MockRequest, RequestHandler, Resolver};

/// Builds routes for the HTTP methods a mock framework supports.
pub trait RestApi {
    fn supports(&self, method: &Method) -> bool;

    /// Returns `None` when the method is unsupported or the URL is rejected.
    fn route(&self, method: &Method, url: &str, resolver: Resolver) -> Option<RequestHandler>;
}

/// A server that accepts handlers at runtime.
pub trait MockServer {
    /// Registers handlers ahead of the ones already installed.
    fn use_handlers(&self, handlers: Vec<RequestHandler>);
}

/// Route builders keyed by lower-cased method name.
#[derive(Debug, Clone)]
pub struct MethodTable {
    methods: Vec<String>,
}

impl Default for MethodTable {
    fn default() -> Self {
        Self::from_names(["get", "head", "post", "put", "delete", "patch", "options"])
    }
}

impl MethodTable {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            methods: names
                .into_iter()
                .map(|name| name.as_ref().to_ascii_lowercase())
                .collect(),
        }
    }
}

impl RestApi for MethodTable {
    fn supports(&self, method: &Method) -> bool {
        self.methods
            .iter()
            .any(|name| name.eq_ignore_ascii_case(method.as_str()))
    }

    fn route(&self, method: &Method, url: &str, resolver: Resolver) -> Option<RequestHandler> {
        if !self.supports(method) {
            return None;
        }
        let url = Url::parse(url).ok()?;
        Some(RequestHandler::new(method.clone(), &url, resolver))
    }
}

/// Dispatches requests to registered handlers without any networking.
#[derive(Debug, Default)]
pub struct InMemoryServer {
    rest: MethodTable,
    match_mode: MatchMode,
    handlers: Mutex<Vec<Arc<RequestHandler>>>,
}

impl InMemoryServer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_methods(rest: MethodTable) -> Self {
        Self {
            rest,
            ..Self::default()
        }
    }

    pub fn match_mode(mut self, match_mode: MatchMode) -> Self {
        self.match_mode = match_mode;
        self
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Arc<RequestHandler>>> {
        self.handlers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// First handler (in precedence order) that matches and answers.
    pub fn handle(&self, request: &MockRequest) -> Option<MockedResponse> {
        // Snapshot so resolvers run without holding the lock.
        let handlers: Vec<Arc<RequestHandler>> = self.lock().clone();
        handlers
            .iter()
            .filter(|handler| handler.matches(request, self.match_mode))
            .find_map(|handler| handler.run(request))
    }

    /// `(method, route URL)` of every handler, in precedence order.
    pub fn routes(&self) -> Vec<(Method, Url)> {
        self.lock()
            .iter()
            .map(|handler| (handler.method().clone(), handler.url().clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn reset_handlers(&self) {
        self.lock().clear();
    }
}

impl RestApi for InMemoryServer {
    fn supports(&self, method: &Method) -> bool {
        self.rest.supports(method)
    }

    fn route(&self, method: &Method, url: &str, resolver: Resolver) -> Option<RequestHandler> {
        self.rest.route(method, url, resolver)
    }
}

impl MockServer for InMemoryServer {
    fn use_handlers(&self, handlers: Vec<RequestHandler>) {
        let mut current = self.lock();
        current.splice(0..0, handlers.into_iter().map(Arc::new));
    }
}

impl<T: MockServer + ?Sized> MockServer for Arc<T> {
    fn use_handlers(&self, handlers: Vec<RequestHandler>) {
        (**self).use_handlers(handlers)
    }
}

impl<T: RestApi + ?Sized> RestApi for Arc<T> {
    fn supports(&self, method: &Method) -> bool {
        (**self).supports(method)
    }

    fn route(&self, method: &Method, url: &str, resolver: Resolver) -> Option<RequestHandler> {
        (**self).route(method, url, resolver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::context::ResponseContext;
    use crate::mock::handler::MockResponse;
    use bytes::Bytes;

    fn answering(body: &'static str) -> Resolver {
        Arc::new(move |_req: &MockRequest| {
            Some(MockResponse::repeat(vec![ResponseContext.body(body)]))
        })
    }

    fn get(url: &str) -> MockRequest {
        MockRequest::new(Method::GET, Url::parse(url).unwrap())
    }

    #[test]
    fn method_table_is_case_insensitive() {
        let table = MethodTable::from_names(["GET", "post"]);
        assert!(table.supports(&Method::GET));
        assert!(table.supports(&Method::POST));
        assert!(!table.supports(&Method::PATCH));
        assert!(table
            .route(&Method::PATCH, "https://a.test/", answering("x"))
            .is_none());
    }

    #[test]
    fn route_rejects_malformed_url() {
        let table = MethodTable::default();
        assert!(table.route(&Method::GET, "not a url", answering("x")).is_none());
    }

    #[test]
    fn later_handlers_take_precedence() {
        let server = InMemoryServer::new();
        let first = server
            .route(&Method::GET, "https://a.test/x", answering("old"))
            .unwrap();
        server.use_handlers(vec![first]);
        let second = server
            .route(&Method::GET, "https://a.test/x", answering("new"))
            .unwrap();
        server.use_handlers(vec![second]);
        assert_eq!(server.len(), 2);
        assert_eq!(
            server.handle(&get("https://a.test/x")).unwrap().body,
            Bytes::from("new")
        );
    }

    #[test]
    fn batch_keeps_its_own_order() {
        let server = InMemoryServer::new();
        let handlers = vec![
            server.route(&Method::GET, "https://a.test/x", answering("a")).unwrap(),
            server.route(&Method::GET, "https://a.test/x", answering("b")).unwrap(),
        ];
        server.use_handlers(handlers);
        assert_eq!(
            server.handle(&get("https://a.test/x")).unwrap().body,
            Bytes::from("a")
        );
    }

    #[test]
    fn declining_resolver_falls_through() {
        let server = InMemoryServer::new();
        let decline: Resolver = Arc::new(|_req: &MockRequest| -> Option<MockResponse> { None });
        let handlers = vec![
            server.route(&Method::GET, "https://a.test/x", decline).unwrap(),
            server.route(&Method::GET, "https://a.test/x", answering("fallback")).unwrap(),
        ];
        server.use_handlers(handlers);
        assert_eq!(
            server.handle(&get("https://a.test/x")).unwrap().body,
            Bytes::from("fallback")
        );
    }

    #[test]
    fn unmatched_request_is_none_and_reset_clears() {
        let server = InMemoryServer::new();
        let handler = server
            .route(&Method::GET, "https://a.test/x", answering("x"))
            .unwrap();
        server.use_handlers(vec![handler]);
        assert!(server.handle(&get("https://a.test/other")).is_none());
        server.reset_handlers();
        assert!(server.is_empty());
        assert!(server.handle(&get("https://a.test/x")).is_none());
    }
}
