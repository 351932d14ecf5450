//! # Demo State
//!
//! Project settings and the API clients shared by the walkthrough.

use std::sync::Arc;
use tracing::{info, warn};
use xsolla_core::{BoxedLoginApi, BoxedStoreApi, XsollaSettings};
use xsolla_http::{ClientConfig, XsollaLogin, XsollaPayStation, XsollaStore};

const SETTINGS_PATHS: [&str; 3] = [
    "config/xsolla.toml",
    "../config/xsolla.toml",
    "../../config/xsolla.toml",
];

/// Test account used for sign-in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Read `XSOLLA_USERNAME` / `XSOLLA_PASSWORD`; `None` if either is unset
    pub fn from_env() -> Option<Self> {
        dotenvy::dotenv().ok();

        let username = std::env::var("XSOLLA_USERNAME").ok().filter(|u| !u.is_empty())?;
        let password = std::env::var("XSOLLA_PASSWORD").ok().filter(|p| !p.is_empty())?;
        Some(Self { username, password })
    }
}

/// Clients for one project
#[derive(Clone)]
pub struct DemoState {
    pub config: ClientConfig,
    pub store: BoxedStoreApi,
    pub login: BoxedLoginApi,
    pub paystation: XsollaPayStation,
}

impl DemoState {
    /// Build clients from `config/xsolla.toml`, falling back to the environment
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self::with_config(load_client_config(&SETTINGS_PATHS)?))
    }

    pub fn with_config(config: ClientConfig) -> Self {
        Self {
            store: Arc::new(XsollaStore::new(config.clone())),
            login: Arc::new(XsollaLogin::new(config.clone())),
            paystation: XsollaPayStation::new(config.clone()),
            config,
        }
    }

    pub fn settings(&self) -> &XsollaSettings {
        &self.config.settings
    }
}

/// Settings file plus `XSOLLA_*` overrides, or the environment alone.
///
/// Secrets such as the merchant api key are never kept in the file.
fn load_client_config(paths: &[&str]) -> anyhow::Result<ClientConfig> {
    let config = match load_settings(paths)? {
        Some(settings) => ClientConfig::new(settings).with_env_overrides()?,
        None => {
            warn!("No config/xsolla.toml found, reading settings from the environment");
            ClientConfig::from_env()?
        }
    };
    Ok(config)
}

/// Load settings from the first readable path
fn load_settings(paths: &[&str]) -> anyhow::Result<Option<XsollaSettings>> {
    for path in paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            let settings = XsollaSettings::from_toml(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?;
            settings.validate()?;
            info!(
                "Loaded settings for project {} from {}",
                settings.store_project_id, path
            );
            return Ok(Some(settings));
        }
    }

    Ok(None)
}
