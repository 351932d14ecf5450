//! Request headers attached to outgoing API calls.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Immutable header name/value pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebRequestHeader {
    name: String,
    value: String,
}

impl WebRequestHeader {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// `Authorization: Bearer <token>`
    pub fn auth_header(token: &str) -> Self {
        Self::new("Authorization", format!("Bearer {}", token))
    }

    /// `Authorization: Basic <base64(secret)>`
    pub fn auth_basic(secret: &str) -> Self {
        Self::new("Authorization", format!("Basic {}", STANDARD.encode(secret)))
    }

    /// Basic auth from a `user:password` pair
    pub fn auth_basic_credentials(user: &str, password: &str) -> Self {
        Self::auth_basic(&format!("{}:{}", user, password))
    }

    pub fn content_type_json() -> Self {
        Self::new("Content-Type", "application/json")
    }

    pub fn content_type_form() -> Self {
        Self::new("Content-Type", "application/x-www-form-urlencoded")
    }

    pub fn accept_json() -> Self {
        Self::new("Accept", "application/json")
    }
}
