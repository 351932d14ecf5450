//! # Project Settings
//!
//! Merchant and project identifiers the SDK needs for every call.
//! Settings are usually kept in `config/xsolla.toml`:
//!
//! ```toml
//! [xsolla]
//! store_project_id = "44056"
//! login_id = "e6dfaac6-78a8-11e9-9244-42010aa80004"
//! merchant_id = "112233"
//! paystation_project_id = "44056"
//! is_sandbox = true
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

const PAYSTATION_URL: &str = "https://secure.xsolla.com/paystation3/?access_token=";
const PAYSTATION_SANDBOX_URL: &str = "https://sandbox-secure.xsolla.com/paystation3/?access_token=";

/// Identifiers for one Xsolla project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XsollaSettings {
    /// Store (in-game store) project ID
    pub store_project_id: String,

    /// Login project ID (UUID)
    #[serde(default)]
    pub login_id: String,

    /// Merchant ID, required for server-side PayStation tokens
    #[serde(default)]
    pub merchant_id: String,

    /// PayStation project ID
    #[serde(default)]
    pub paystation_project_id: String,

    /// Merchant API key (never ship this inside a game client)
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Locale for catalogue texts (e.g., "en")
    #[serde(default)]
    pub locale: Option<String>,

    /// Route purchases through the sandbox PayStation
    #[serde(default = "default_true")]
    pub is_sandbox: bool,
}

fn default_true() -> bool {
    true
}

impl XsollaSettings {
    /// Create settings for a store project
    pub fn new(store_project_id: impl Into<String>) -> Self {
        Self {
            store_project_id: store_project_id.into(),
            login_id: String::new(),
            merchant_id: String::new(),
            paystation_project_id: String::new(),
            api_key: None,
            locale: None,
            is_sandbox: true,
        }
    }

    /// Load settings from TOML, either under `[xsolla]` or at the top level
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let mut table: toml::Table = toml::from_str(toml_str)?;
        let settings = match table.remove("xsolla") {
            Some(section) => section,
            None => toml::Value::Table(table),
        };
        Ok(settings.try_into()?)
    }

    /// Builder: set the login project ID
    pub fn with_login_id(mut self, login_id: impl Into<String>) -> Self {
        self.login_id = login_id.into();
        self
    }

    /// Builder: set merchant credentials
    pub fn with_merchant(mut self, merchant_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        self.merchant_id = merchant_id.into();
        self.api_key = Some(api_key.into());
        self
    }

    /// Builder: set the PayStation project ID
    pub fn with_paystation_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.paystation_project_id = project_id.into();
        self
    }

    /// Builder: set the catalogue locale
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Builder: toggle sandbox mode
    pub fn with_sandbox(mut self, is_sandbox: bool) -> Self {
        self.is_sandbox = is_sandbox;
        self
    }

    /// Check that the store project is configured
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store_project_id.trim().is_empty() {
            return Err(ConfigError::Missing("store_project_id"));
        }
        if !self.paystation_project_id.is_empty() {
            self.paystation_project_number()?;
        }
        Ok(())
    }

    /// PayStation project ID as the number the merchant API expects
    pub fn paystation_project_number(&self) -> Result<i64, ConfigError> {
        let id = if self.paystation_project_id.is_empty() {
            &self.store_project_id
        } else {
            &self.paystation_project_id
        };
        id.trim().parse().map_err(|_| ConfigError::Invalid {
            name: "paystation_project_id",
            message: format!("expected a numeric project id, got '{}'", id),
        })
    }

    /// Hosted PayStation URL for an access token
    pub fn paystation_url(&self, token: &str) -> String {
        let base = if self.is_sandbox {
            PAYSTATION_SANDBOX_URL
        } else {
            PAYSTATION_URL
        };
        format!("{}{}", base, token)
    }
}
