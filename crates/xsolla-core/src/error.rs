//! # Error Types
//!
//! Typed error handling for the Xsolla SDK.
//! Every API operation returns `Result<T, XsollaError>`; the error carries the
//! vendor's raw codes alongside the classified [`ErrorType`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classified error category reported to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorType {
    /// Transport failure, no response body was received
    NetworkError,
    /// Error object present but not covered by any table
    UnknownError,

    // Store
    InvalidToken,
    MethodIsNotAllowed,
    InvalidData,
    ProductDoesNotExist,
    UserNotFound,
    CartNotFound,

    // Login
    InvalidProjectSettings,
    InvalidLoginOrPassword,
    UserIsNotActivated,
    CaptchaRequired,
    RegistrationNotAllowed,
    UsernameIsTaken,
    EmailIsTaken,
    PasswordResetNotAllowed,
}

impl ErrorType {
    /// Stable name used in logs and error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::NetworkError => "NetworkError",
            ErrorType::UnknownError => "UnknownError",
            ErrorType::InvalidToken => "InvalidToken",
            ErrorType::MethodIsNotAllowed => "MethodIsNotAllowed",
            ErrorType::InvalidData => "InvalidData",
            ErrorType::ProductDoesNotExist => "ProductDoesNotExist",
            ErrorType::UserNotFound => "UserNotFound",
            ErrorType::CartNotFound => "CartNotFound",
            ErrorType::InvalidProjectSettings => "InvalidProjectSettings",
            ErrorType::InvalidLoginOrPassword => "InvalidLoginOrPassword",
            ErrorType::UserIsNotActivated => "UserIsNotActivated",
            ErrorType::CaptchaRequired => "CaptchaRequired",
            ErrorType::RegistrationNotAllowed => "RegistrationNotAllowed",
            ErrorType::UsernameIsTaken => "UsernameIsTaken",
            ErrorType::EmailIsTaken => "EmailIsTaken",
            ErrorType::PasswordResetNotAllowed => "PasswordResetNotAllowed",
        }
    }
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed API call.
///
/// Built once per failure, handed to the caller, then dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "Error - Type: {error_type}. Status code: {}. Error code: {}. Error message: {}.",
    .status_code.as_deref().unwrap_or(""),
    .error_code.as_deref().unwrap_or(""),
    .error_message.as_deref().unwrap_or("")
)]
pub struct XsollaError {
    /// Status code reported inside the response body
    pub status_code: Option<String>,
    /// Vendor-specific error code
    pub error_code: Option<String>,
    /// Human readable message from the API
    pub error_message: Option<String>,
    /// Classified category
    pub error_type: ErrorType,
}

impl XsollaError {
    /// Create an error with a status code and no classification yet
    pub fn new(status_code: impl Into<String>) -> Self {
        Self {
            status_code: Some(status_code.into()),
            error_code: None,
            error_message: None,
            error_type: ErrorType::UnknownError,
        }
    }

    /// Sentinel for transport failures
    pub fn network_error() -> Self {
        Self::of_type(ErrorType::NetworkError)
    }

    /// Sentinel for errors that could not be classified
    pub fn unknown_error() -> Self {
        Self::of_type(ErrorType::UnknownError)
    }

    /// Error of the given type with no vendor codes attached
    pub fn of_type(error_type: ErrorType) -> Self {
        Self {
            status_code: None,
            error_code: None,
            error_message: None,
            error_type,
        }
    }

    /// Builder: set the vendor error code
    pub fn with_error_code(mut self, code: impl Into<String>) -> Self {
        self.error_code = Some(code.into());
        self
    }

    /// Builder: set the error message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    /// Builder: set the classified type
    pub fn with_type(mut self, error_type: ErrorType) -> Self {
        self.error_type = error_type;
        self
    }

    /// Status code, if the body carried a non-empty one
    pub fn status(&self) -> Option<&str> {
        self.status_code.as_deref().filter(|s| !s.is_empty())
    }

    pub fn is_network_error(&self) -> bool {
        self.error_type == ErrorType::NetworkError
    }

    pub fn is_unknown(&self) -> bool {
        self.error_type == ErrorType::UnknownError
    }
}

/// Result type alias for SDK operations
pub type XsollaResult<T> = Result<T, XsollaError>;

/// Settings could not be loaded or are incomplete
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing setting: {0}")]
    Missing(&'static str),

    #[error("Invalid setting {name}: {message}")]
    Invalid { name: &'static str, message: String },

    #[error("Failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),
}

impl From<ConfigError> for XsollaError {
    fn from(err: ConfigError) -> Self {
        XsollaError::of_type(ErrorType::InvalidProjectSettings).with_message(err.to_string())
    }
}
