//! Minimal HTTP mocking framework surface.
//!
//! The archive mapper only depends on the [`RestApi`] and [`MockServer`]
//! traits. [`InMemoryServer`] implements both and dispatches requests
//! without networking; the replay server in [`crate::serve`] puts it behind
//! a socket.

mod context;
mod handler;
mod server;

pub use context::{CookieOptions, MockedResponse, ResponseContext, ResponseTransformer};
pub use handler::{
    route_url, MatchMode, MockRequest, MockResponse, RequestHandler, Resolver, ResponseMode,
};
pub use server::{InMemoryServer, MethodTable, MockServer, RestApi};

pub(crate) use handler::search;
