//! # Parse Utilities
//!
//! JSON helpers shared by every client. Parse failures never propagate:
//! they are logged and turned into `None`, leaving the caller to decide
//! what a missing payload means.

use crate::error::XsollaError;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::OnceLock;
use tracing::warn;

/// Deserialize `json` into `T`, swallowing errors into `None`
pub fn from_json<T: DeserializeOwned>(json: &str) -> Option<T> {
    match serde_json::from_str::<T>(json) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(
                "Failed to parse {}: {}",
                std::any::type_name::<T>(),
                e
            );
            None
        }
    }
}

/// Store API error body
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoreErrorBody {
    #[serde(default, deserialize_with = "de::opt_string")]
    status_code: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    error_code: Option<String>,
    #[serde(default)]
    error_message: Option<String>,
}

impl StoreErrorBody {
    fn is_valid(&self) -> bool {
        self.status_code.as_deref().is_some_and(|s| !s.is_empty())
    }

    fn into_error(self) -> XsollaError {
        XsollaError {
            status_code: self.status_code,
            error_code: self.error_code,
            error_message: self.error_message,
            ..XsollaError::unknown_error()
        }
    }
}

/// Login API error body: `{"error": {"code": "003-007", "description": ".."}}`
#[derive(Debug, Deserialize)]
struct LoginErrorBody {
    #[serde(default)]
    error: Option<LoginErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct LoginErrorDetail {
    #[serde(default, deserialize_with = "de::opt_string")]
    code: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl LoginErrorDetail {
    fn into_error(self) -> XsollaError {
        XsollaError {
            status_code: self.code.clone(),
            error_code: self.code,
            error_message: self.description,
            ..XsollaError::unknown_error()
        }
    }
}

/// Extract the embedded error object from a response body.
///
/// The Store shape is tried first; when it is absent or has no status code,
/// the Login shape is converted into the same representation.
pub fn parse_error(json: &str) -> Option<XsollaError> {
    // Try without logging: most bodies are successful payloads
    if let Ok(store) = serde_json::from_str::<StoreErrorBody>(json) {
        if store.is_valid() {
            return Some(store.into_error());
        }
    }

    serde_json::from_str::<LoginErrorBody>(json)
        .ok()
        .and_then(|body| body.error)
        .map(LoginErrorDetail::into_error)
}

static TOKEN_PATTERN: OnceLock<Option<Regex>> = OnceLock::new();

fn token_pattern() -> Option<&'static Regex> {
    TOKEN_PATTERN
        .get_or_init(|| Regex::new(r"token=(\S*?)[&#]").ok())
        .as_ref()
}

/// Pull the `token` query value out of a login redirect URL.
///
/// The value must be terminated by `&` or `#`; anything else yields an
/// empty string.
pub fn parse_token(login_url: &str) -> String {
    token_pattern()
        .and_then(|re| re.captures(login_url))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Lenient deserializers for fields the APIs send as either strings or numbers
pub mod de {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Int(i64),
        Float(f64),
    }

    /// `"422"`, `422` and `null` all deserialize; numbers become strings
    pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<StringOrNumber>::deserialize(deserializer)?;
        Ok(value.map(|v| match v {
            StringOrNumber::String(s) => s,
            StringOrNumber::Int(i) => i.to_string(),
            StringOrNumber::Float(f) => f.to_string(),
        }))
    }

    /// `"1.99"`, `1.99` and `null` all deserialize; unparseable strings become 0
    pub fn amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<StringOrNumber>::deserialize(deserializer)?;
        Ok(match value {
            Some(StringOrNumber::String(s)) => s.trim().parse().unwrap_or(0.0),
            Some(StringOrNumber::Int(i)) => i as f64,
            Some(StringOrNumber::Float(f)) => f,
            None => 0.0,
        })
    }
}
