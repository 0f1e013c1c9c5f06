//! Options controlling how archive entries become mock handlers.

use std::fmt;
use std::sync::Arc;

use tracing::Level;

use crate::diagnostics::{Diagnostics, TracingDiagnostics};

/// Rewrites a recorded `Access-Control-Allow-Origin` value.
pub type OriginResolver = Arc<dyn Fn(&str) -> String + Send + Sync>;

#[derive(Clone)]
pub struct ProviderOptions {
    /// Only answer when the incoming query string equals the recorded one.
    pub strict_query_string: bool,
    /// Consume each mock after its first match instead of keeping it reusable.
    pub use_unique_requests: bool,
    /// Rewrites `Access-Control-Allow-Origin` values; identity when `None`.
    pub resolve_cross_origins: Option<OriginResolver>,
    /// Suppress all diagnostics.
    pub quiet: bool,
    /// Append a trailing `{"status": true}` JSON instruction after the recorded body.
    pub acknowledge: bool,
    pub diagnostics: Arc<dyn Diagnostics>,
}

impl Default for ProviderOptions {
    fn default() -> Self {
        Self {
            strict_query_string: false,
            use_unique_requests: false,
            resolve_cross_origins: None,
            quiet: false,
            acknowledge: false,
            diagnostics: Arc::new(TracingDiagnostics),
        }
    }
}

impl fmt::Debug for ProviderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderOptions")
            .field("strict_query_string", &self.strict_query_string)
            .field("use_unique_requests", &self.use_unique_requests)
            .field("resolve_cross_origins", &self.resolve_cross_origins.is_some())
            .field("quiet", &self.quiet)
            .field("acknowledge", &self.acknowledge)
            .finish_non_exhaustive()
    }
}

impl ProviderOptions {
    pub fn with_cross_origin_resolver<F>(mut self, resolve: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.resolve_cross_origins = Some(Arc::new(resolve));
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub(crate) fn resolve_origin(&self, origin: &str) -> String {
        match &self.resolve_cross_origins {
            Some(resolve) => resolve(origin),
            None => origin.to_string(),
        }
    }

    pub(crate) fn emit(&self, level: Level, message: &str) {
        if !self.quiet {
            self.diagnostics.log(level, message);
        }
    }

    pub(crate) fn warn(&self, message: &str) {
        self.emit(Level::WARN, message);
    }

    pub(crate) fn info(&self, message: &str) {
        self.emit(Level::INFO, message);
    }

    pub(crate) fn debug(&self, message: &str) {
        self.emit(Level::DEBUG, message);
    }
}
