//! `harmock routes <path>` – list routes registered from a HAR file.

use anyhow::Result;
use harmock_core::diagnostics::NoopDiagnostics;
use harmock_core::{set_request_handlers_by_webarchive, Archive, InMemoryServer, ProviderOptions};
use std::path::Path;
use std::sync::Arc;

pub fn run_routes(path: &Path) -> Result<()> {
    let archive = Archive::from_path(path)?;
    let server = InMemoryServer::new();
    let options = ProviderOptions::default().with_diagnostics(Arc::new(NoopDiagnostics));
    let registered = set_request_handlers_by_webarchive(&server, &archive, &options);

    for (method, url) in server.routes() {
        println!("{:<8} {}", method.as_str(), url);
    }
    let skipped = archive.entries().len() - registered;
    println!("{registered} routes registered, {skipped} skipped");
    Ok(())
}
