use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::context::FeatureGates;
use crate::resolver::hub::{HubResolver, YAML_ENDPOINT};

/// Default enablement for each resolver type ([resolvers] section).
///
/// These are only defaults for contexts built from config; the per-request
/// context remains the source of truth during validation and resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverGates {
    pub enable_hub_resolver: bool,
    pub enable_bundles_resolver: bool,
}

impl Default for ResolverGates {
    fn default() -> Self {
        Self {
            enable_hub_resolver: true,
            enable_bundles_resolver: true,
        }
    }
}

/// Global configuration loaded from `~/.config/rmr/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RmrConfig {
    /// Base URL of the catalog hub API.
    pub hub_url: String,
    /// Endpoint template joined onto `hub_url`; placeholders are
    /// {catalog}, {kind}, {name}, {version}.
    #[serde(default = "default_yaml_endpoint")]
    pub yaml_endpoint: String,
    /// Connect timeout for hub requests, in seconds.
    pub connect_timeout_secs: u64,
    /// Total request timeout for hub requests, in seconds.
    pub request_timeout_secs: u64,
    /// Resolver enablement defaults; if missing, everything is enabled.
    #[serde(default)]
    pub resolvers: ResolverGates,
}

fn default_yaml_endpoint() -> String {
    YAML_ENDPOINT.to_string()
}

impl Default for RmrConfig {
    fn default() -> Self {
        Self {
            hub_url: "https://api.hub.svc.cluster.local".to_string(),
            yaml_endpoint: default_yaml_endpoint(),
            connect_timeout_secs: 15,
            request_timeout_secs: 60,
            resolvers: ResolverGates::default(),
        }
    }
}

impl RmrConfig {
    /// Feature gates derived from the configured defaults.
    pub fn gates(&self) -> FeatureGates {
        FeatureGates {
            hub: self.resolvers.enable_hub_resolver,
            bundles: self.resolvers.enable_bundles_resolver,
        }
    }

    /// A hub resolver configured from this file.
    pub fn hub_resolver(&self) -> HubResolver {
        let mut resolver =
            HubResolver::new(&self.hub_url).with_yaml_endpoint(&self.yaml_endpoint);
        resolver.connect_timeout = Duration::from_secs(self.connect_timeout_secs);
        resolver.request_timeout = Duration::from_secs(self.request_timeout_secs);
        resolver
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("rmr")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<RmrConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = RmrConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: RmrConfig = toml::from_str(&data)?;
    Ok(cfg)
}
