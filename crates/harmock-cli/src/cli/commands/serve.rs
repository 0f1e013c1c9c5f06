//! `harmock serve <path>` – replay a HAR file over HTTP until Ctrl-C.

use anyhow::{Context, Result};
use harmock_core::config::HarmockConfig;
use harmock_core::serve::serve;
use harmock_core::{set_request_handlers_by_webarchive, Archive, InMemoryServer};
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Serve flags; set flags override the config file.
#[derive(Debug, Default)]
pub struct ServeArgs {
    pub addr: Option<String>,
    pub strict_query: bool,
    pub unique: bool,
    pub quiet: bool,
    pub cors_origin: Option<String>,
    pub match_origin: bool,
    pub acknowledge: bool,
}

impl ServeArgs {
    pub fn apply(self, mut cfg: HarmockConfig) -> HarmockConfig {
        if let Some(addr) = self.addr {
            cfg.listen = addr;
        }
        if self.cors_origin.is_some() {
            cfg.cors_origin = self.cors_origin;
        }
        cfg.strict_query_string |= self.strict_query;
        cfg.use_unique_requests |= self.unique;
        cfg.quiet |= self.quiet;
        cfg.match_origin |= self.match_origin;
        cfg.acknowledge |= self.acknowledge;
        cfg
    }
}

pub async fn run_serve(path: &Path, cfg: HarmockConfig) -> Result<()> {
    let archive = Archive::from_path(path)?;
    let server = Arc::new(InMemoryServer::new().match_mode(cfg.match_mode()));
    let registered = set_request_handlers_by_webarchive(&server, &archive, &cfg.provider_options());

    let listener = TcpListener::bind(&cfg.listen)
        .await
        .with_context(|| format!("bind {}", cfg.listen))?;
    let addr = listener.local_addr()?;
    println!(
        "Serving {registered} recorded responses from {} on http://{addr}",
        path.display()
    );

    tokio::select! {
        res = serve(listener, server) => res?,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutting down replay server");
            println!("Stopped.");
        }
    }
    Ok(())
}
