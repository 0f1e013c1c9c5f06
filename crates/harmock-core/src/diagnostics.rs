//! Injectable diagnostics sink.
//!
//! The mapper and provider report warnings (empty archive, unmatched query
//! string, delayed responses) through a [`Diagnostics`] handle carried by
//! [`ProviderOptions`](crate::options::ProviderOptions), so callers can route
//! them anywhere. `quiet` is applied before the sink is called.

use tracing::Level;

/// Receives diagnostic messages.
pub trait Diagnostics: Send + Sync {
    fn log(&self, level: Level, message: &str);
}

/// Forwards every message to the `tracing` macros.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn log(&self, level: Level, message: &str) {
        match level {
            Level::ERROR => tracing::error!("{}", message),
            Level::WARN => tracing::warn!("{}", message),
            Level::INFO => tracing::info!("{}", message),
            Level::DEBUG => tracing::debug!("{}", message),
            _ => tracing::trace!("{}", message),
        }
    }
}

/// Drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDiagnostics;

impl Diagnostics for NoopDiagnostics {
    fn log(&self, _level: Level, _message: &str) {}
}
