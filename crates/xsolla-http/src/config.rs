//! # Client Configuration
//!
//! Project settings plus the API base URLs the clients talk to.
//! Identifiers can be loaded from environment variables (and `.env`).

use reqwest::Url;
use std::env;
use xsolla_core::{ConfigError, XsollaSettings};

pub const DEFAULT_STORE_BASE_URL: &str = "https://store.xsolla.com/api";
pub const DEFAULT_LOGIN_BASE_URL: &str = "https://login.xsolla.com/api";
pub const DEFAULT_MERCHANT_BASE_URL: &str = "https://api.xsolla.com/merchant/v2";

/// Settings and endpoints shared by the Store, Login and PayStation clients
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Project identifiers
    pub settings: XsollaSettings,

    /// Store API base URL (for testing/mocking)
    pub store_base_url: String,

    /// Login API base URL
    pub login_base_url: String,

    /// Merchant API base URL
    pub merchant_base_url: String,
}

impl ClientConfig {
    /// Create config with the production endpoints
    pub fn new(settings: XsollaSettings) -> Self {
        Self {
            settings,
            store_base_url: DEFAULT_STORE_BASE_URL.to_string(),
            login_base_url: DEFAULT_LOGIN_BASE_URL.to_string(),
            merchant_base_url: DEFAULT_MERCHANT_BASE_URL.to_string(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `XSOLLA_STORE_PROJECT_ID`
    ///
    /// Optional:
    /// - `XSOLLA_LOGIN_ID`, `XSOLLA_MERCHANT_ID`, `XSOLLA_PAYSTATION_PROJECT_ID`
    /// - `XSOLLA_API_KEY`, `XSOLLA_LOCALE`, `XSOLLA_SANDBOX`
    /// - `XSOLLA_STORE_BASE_URL`, `XSOLLA_LOGIN_BASE_URL`, `XSOLLA_MERCHANT_BASE_URL`
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let store_project_id = env::var("XSOLLA_STORE_PROJECT_ID")
            .map_err(|_| ConfigError::Missing("XSOLLA_STORE_PROJECT_ID"))?;

        Self::new(XsollaSettings::new(store_project_id)).with_env_overrides()
    }

    /// Apply the optional `XSOLLA_*` variables on top of existing settings.
    ///
    /// Unset or empty variables leave the current value in place, so a TOML
    /// file can hold the project ids while secrets come from the environment.
    pub fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let settings = &mut self.settings;
        if let Some(id) = env_value("XSOLLA_LOGIN_ID") {
            settings.login_id = id;
        }
        if let Some(id) = env_value("XSOLLA_MERCHANT_ID") {
            settings.merchant_id = id;
        }
        if let Some(id) = env_value("XSOLLA_PAYSTATION_PROJECT_ID") {
            settings.paystation_project_id = id;
        }
        if let Some(key) = env_value("XSOLLA_API_KEY") {
            settings.api_key = Some(key);
        }
        if let Some(locale) = env_value("XSOLLA_LOCALE") {
            settings.locale = Some(locale);
        }
        if let Some(sandbox) = env_value("XSOLLA_SANDBOX") {
            settings.is_sandbox = parse_flag("XSOLLA_SANDBOX", &sandbox)?;
        }

        settings.validate()?;

        if let Some(url) = env_value("XSOLLA_STORE_BASE_URL") {
            self.store_base_url = url;
        }
        if let Some(url) = env_value("XSOLLA_LOGIN_BASE_URL") {
            self.login_base_url = url;
        }
        if let Some(url) = env_value("XSOLLA_MERCHANT_BASE_URL") {
            self.merchant_base_url = url;
        }

        Ok(self)
    }

    /// Builder: set custom Store API base URL (for testing)
    pub fn with_store_base_url(mut self, url: impl Into<String>) -> Self {
        self.store_base_url = url.into();
        self
    }

    /// Builder: set custom Login API base URL (for testing)
    pub fn with_login_base_url(mut self, url: impl Into<String>) -> Self {
        self.login_base_url = url.into();
        self
    }

    /// Builder: set custom Merchant API base URL (for testing)
    pub fn with_merchant_base_url(mut self, url: impl Into<String>) -> Self {
        self.merchant_base_url = url.into();
        self
    }

    /// Point every API at one base URL (a single mock server)
    pub fn with_base_url(self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.with_store_base_url(url.clone())
            .with_login_base_url(url.clone())
            .with_merchant_base_url(url)
    }

    pub fn store_url(&self, path: &str) -> String {
        join_url(&self.store_base_url, path)
    }

    pub fn login_url(&self, path: &str) -> String {
        join_url(&self.login_base_url, path)
    }

    pub fn merchant_url(&self, path: &str) -> String {
        join_url(&self.merchant_base_url, path)
    }

    /// Store URL for `path` followed by percent-encoded `segments`
    pub fn store_url_segments(&self, path: &str, segments: &[&str]) -> Result<String, ConfigError> {
        join_segments(&self.store_url(path), "XSOLLA_STORE_BASE_URL", segments)
    }

    /// Merchant URL for `path` followed by percent-encoded `segments`
    pub fn merchant_url_segments(
        &self,
        path: &str,
        segments: &[&str],
    ) -> Result<String, ConfigError> {
        join_segments(&self.merchant_url(path), "XSOLLA_MERCHANT_BASE_URL", segments)
    }
}

fn env_value(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Append path segments, escaping `/`, `?`, `#` and `%` inside each one
fn join_segments(base: &str, name: &'static str, segments: &[&str]) -> Result<String, ConfigError> {
    let invalid = |message: String| ConfigError::Invalid { name, message };

    let mut url = Url::parse(base).map_err(|e| invalid(format!("'{}': {}", base, e)))?;
    url.path_segments_mut()
        .map_err(|_| invalid(format!("'{}' cannot be a base URL", base)))?
        .pop_if_empty()
        .extend(segments);

    Ok(url.to_string())
}

fn parse_flag(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::Invalid {
            name,
            message: format!("expected a boolean, got '{}'", other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoints() {
        let config = ClientConfig::new(XsollaSettings::new("44056"));

        assert_eq!(
            config.store_url("v1/cart"),
            "https://store.xsolla.com/api/v1/cart"
        );
        assert_eq!(
            config.login_url("/login"),
            "https://login.xsolla.com/api/login"
        );
        assert_eq!(
            config.merchant_url("merchants/1/token"),
            "https://api.xsolla.com/merchant/v2/merchants/1/token"
        );
    }

    #[test]
    fn test_base_url_override() {
        let config =
            ClientConfig::new(XsollaSettings::new("1")).with_base_url("http://127.0.0.1:9000/");

        assert_eq!(config.store_url("/v1/cart"), "http://127.0.0.1:9000/v1/cart");
        assert_eq!(config.login_url("user"), "http://127.0.0.1:9000/user");
        assert_eq!(config.merchant_base_url, "http://127.0.0.1:9000/");
    }

    #[test]
    fn test_url_segments_are_escaped() {
        let config =
            ClientConfig::new(XsollaSettings::new("1")).with_base_url("http://127.0.0.1:9000/");

        assert_eq!(
            config
                .store_url_segments("v1/payment/item", &["sword#gold"])
                .unwrap(),
            "http://127.0.0.1:9000/v1/payment/item/sword%23gold"
        );
        assert_eq!(
            config
                .store_url_segments("v1/cart", &["7", "item", "pack/10?x"])
                .unwrap(),
            "http://127.0.0.1:9000/v1/cart/7/item/pack%2F10%3Fx"
        );
        assert_eq!(
            config
                .merchant_url_segments("merchants", &["12345", "token"])
                .unwrap(),
            "http://127.0.0.1:9000/merchants/12345/token"
        );
    }

    #[test]
    fn test_url_segments_bad_base() {
        let config = ClientConfig::new(XsollaSettings::new("1")).with_store_base_url("not a url");

        assert!(matches!(
            config.store_url_segments("v1/cart", &["1"]),
            Err(ConfigError::Invalid { name: "XSOLLA_STORE_BASE_URL", .. })
        ));
    }

    #[test]
    fn test_env_overrides_fill_secrets() {
        env::set_var("XSOLLA_API_KEY", "secret");
        env::set_var("XSOLLA_MERCHANT_ID", "12345");
        env::set_var("XSOLLA_MERCHANT_BASE_URL", "http://127.0.0.1:9001");

        let settings = XsollaSettings::new("44056").with_login_id("from-file");
        let config = ClientConfig::new(settings).with_env_overrides();

        env::remove_var("XSOLLA_API_KEY");
        env::remove_var("XSOLLA_MERCHANT_ID");
        env::remove_var("XSOLLA_MERCHANT_BASE_URL");

        let config = config.unwrap();
        assert_eq!(config.settings.api_key.as_deref(), Some("secret"));
        assert_eq!(config.settings.merchant_id, "12345");
        assert_eq!(config.settings.login_id, "from-file");
        assert_eq!(config.merchant_base_url, "http://127.0.0.1:9001");
        assert_eq!(config.store_base_url, DEFAULT_STORE_BASE_URL);
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("X", "TRUE").unwrap());
        assert!(!parse_flag("X", " off ").unwrap());
        assert!(parse_flag("X", "maybe").is_err());
    }

    #[test]
    fn test_from_env_missing_project() {
        // Clear any existing env vars
        env::remove_var("XSOLLA_STORE_PROJECT_ID");

        let result = ClientConfig::from_env();
        assert!(matches!(
            result,
            Err(ConfigError::Missing("XSOLLA_STORE_PROJECT_ID"))
        ));
    }
}
