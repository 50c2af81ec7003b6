//! Store configuration: where the persistence backend lives and the
//! timing knobs around it. Resolution order mirrors the usual rc-file
//! chain: explicit path, `TRELLIS_CONFIG`, then `~/.trellis.toml`, with
//! `TRELLIS_BASE_URL` able to override the backend location on top.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;
use tracing::{info, warn};

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Base URL of the REST persistence collaborator.
    pub base_url: String,
    pub request_timeout_ms: u64,
    /// Settling delay for search input before projections recompute.
    pub search_debounce_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:4000".to_string(),
            request_timeout_ms: 10_000,
            search_debounce_ms: 500,
        }
    }
}

impl StoreConfig {
    #[tracing::instrument(skip(path_override))]
    pub fn load(path_override: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = match resolve_config_path(path_override) {
            Some(path) if path.exists() => {
                info!(config = %path.display(), "loading store config");
                Self::load_file(&path)?
            }
            Some(path) => {
                warn!(config = %path.display(), "config file not found; using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        if let Ok(base_url) = std::env::var("TRELLIS_BASE_URL") {
            info!(%base_url, "base url overridden from environment");
            config.base_url = base_url;
        }

        Ok(config)
    }

    pub fn load_file(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

fn resolve_config_path(path_override: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = path_override {
        return Some(path.to_path_buf());
    }
    if let Ok(env_path) = std::env::var("TRELLIS_CONFIG") {
        return Some(PathBuf::from(env_path));
    }
    dirs::home_dir().map(|home| home.join(".trellis.toml"))
}
