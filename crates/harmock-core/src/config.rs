use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::mock::MatchMode;
use crate::options::ProviderOptions;

/// Global configuration loaded from `~/.config/harmock/config.toml`.
///
/// Supplies defaults for the replay server; command-line flags override them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarmockConfig {
    /// Address the replay server listens on.
    pub listen: String,
    /// Only answer when the query string matches the recorded one exactly.
    #[serde(default)]
    pub strict_query_string: bool,
    /// Consume each recorded response after its first use.
    #[serde(default)]
    pub use_unique_requests: bool,
    /// Suppress replay diagnostics.
    #[serde(default)]
    pub quiet: bool,
    /// Append the `{"status": true}` acknowledgment body.
    #[serde(default)]
    pub acknowledge: bool,
    /// Replace every recorded `Access-Control-Allow-Origin` with this origin.
    #[serde(default)]
    pub cors_origin: Option<String>,
    /// Match scheme, host and port as recorded instead of the path alone.
    #[serde(default)]
    pub match_origin: bool,
}

impl Default for HarmockConfig {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:8080".to_string(),
            strict_query_string: false,
            use_unique_requests: false,
            quiet: false,
            acknowledge: false,
            cors_origin: None,
            match_origin: false,
        }
    }
}

impl HarmockConfig {
    pub fn provider_options(&self) -> ProviderOptions {
        let options = ProviderOptions {
            strict_query_string: self.strict_query_string,
            use_unique_requests: self.use_unique_requests,
            quiet: self.quiet,
            acknowledge: self.acknowledge,
            ..ProviderOptions::default()
        };
        match self.cors_origin.clone() {
            Some(origin) => options.with_cross_origin_resolver(move |_| origin.clone()),
            None => options,
        }
    }

    pub fn match_mode(&self) -> MatchMode {
        if self.match_origin {
            MatchMode::Url
        } else {
            MatchMode::Path
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("harmock")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<HarmockConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = HarmockConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

pub fn load_from(path: &Path) -> Result<HarmockConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: HarmockConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}
