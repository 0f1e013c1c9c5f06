//! Registers every usable archive entry with a mock server.

use crate::har::Archive;
use crate::mapper::create_request_handler;
use crate::mock::{MockServer, RestApi};
use crate::options::ProviderOptions;

/// Sets request handlers on `server` for the request/response pairs in `archive`.
///
/// Entries that cannot be mapped (unsupported method, malformed URL, route
/// rejected) are skipped. All remaining handlers are registered with a single
/// [`MockServer::use_handlers`] call. Returns how many were registered.
pub fn set_request_handlers_by_webarchive<S>(
    server: &S,
    archive: &Archive,
    options: &ProviderOptions,
) -> usize
where
    S: MockServer + RestApi + ?Sized,
{
    let entries = archive.entries();
    if entries.is_empty() {
        options.warn("Note: No request definitions found in passed web-archive file");
    }

    let handlers: Vec<_> = entries
        .iter()
        .filter_map(|entry| create_request_handler(entry, options, server))
        .collect();

    let registered = handlers.len();
    options.debug(&format!(
        "Registering {} web-archive handlers ({} skipped)",
        registered,
        entries.len() - registered
    ));
    server.use_handlers(handlers);
    registered
}
