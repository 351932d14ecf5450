//! # PayStation Entities
//!
//! Body of the merchant token request. The nesting mirrors the API:
//! `{"user": {"id": {"value": ..}}, "settings": {..}, "purchase": {"checkout": {..}}}`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Value {
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub project_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Checkout {
    pub amount: f64,
    pub currency: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    pub checkout: Checkout,
}

/// Request for a PayStation access token
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenRequest {
    pub user: User,
    pub settings: Settings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase: Option<Purchase>,
}

impl TokenRequest {
    /// Create a request for a user in a PayStation project
    pub fn new(user_id: impl Into<String>, project_id: i64) -> Self {
        Self {
            user: User {
                id: Value {
                    value: user_id.into(),
                },
                email: None,
            },
            settings: Settings {
                project_id,
                mode: None,
            },
            purchase: None,
        }
    }

    /// Builder: set the user's email
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.user.email = Some(Value {
            value: email.into(),
        });
        self
    }

    /// Builder: set a fixed checkout amount
    pub fn with_checkout(mut self, amount: f64, currency: impl Into<String>) -> Self {
        self.purchase = Some(Purchase {
            checkout: Checkout {
                amount,
                currency: currency.into(),
            },
        });
        self
    }

    /// Builder: run the payment UI in sandbox mode
    pub fn sandbox(mut self) -> Self {
        self.settings.mode = Some("sandbox".to_string());
        self
    }
}
