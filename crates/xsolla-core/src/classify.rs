//! # Error Classification
//!
//! Maps the codes embedded in a response body onto [`ErrorType`].
//!
//! Lookup happens in two tiers: the table supplied for the specific call is
//! consulted first, then the general table for the API family. Codes found in
//! neither collapse into the unknown-error sentinel.
//!
//! ```text
//!   body ──► parse_error ──► status code? ──no──► success
//!                                 │
//!                                yes
//!                                 ▼
//!                     call-specific table ──hit──► typed error
//!                                 │miss
//!                                 ▼
//!                         general table ──hit──► typed error
//!                                 │miss
//!                                 ▼
//!                          unknown sentinel
//! ```

use crate::error::{ErrorType, XsollaError};
use crate::parse::parse_error;

/// Static, read-only mapping from a vendor code to an [`ErrorType`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorTable {
    name: &'static str,
    entries: &'static [(&'static str, ErrorType)],
}

impl ErrorTable {
    pub const fn new(name: &'static str, entries: &'static [(&'static str, ErrorType)]) -> Self {
        Self { name, entries }
    }

    /// Table name, used in logs
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Find the category for `code`
    pub fn lookup(&self, code: &str) -> Option<ErrorType> {
        self.entries
            .iter()
            .find(|(key, _)| *key == code)
            .map(|(_, error_type)| *error_type)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.lookup(code).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// Store tables (keyed by status code)
// =============================================================================

pub const GENERAL_ERRORS: ErrorTable = ErrorTable::new(
    "general",
    &[
        ("403", ErrorType::InvalidToken),
        ("405", ErrorType::MethodIsNotAllowed),
    ],
);

pub const ITEMS_LIST_ERRORS: ErrorTable =
    ErrorTable::new("items_list", &[("422", ErrorType::InvalidData)]);

pub const BUY_ITEM_ERRORS: ErrorTable =
    ErrorTable::new("buy_item", &[("422", ErrorType::ProductDoesNotExist)]);

pub const CREATE_CART_ERRORS: ErrorTable = ErrorTable::new(
    "create_cart",
    &[
        ("403", ErrorType::InvalidToken),
        ("404", ErrorType::UserNotFound),
        ("422", ErrorType::InvalidData),
    ],
);

const CART_ERRORS: &[(&str, ErrorType)] = &[
    ("403", ErrorType::InvalidToken),
    ("404", ErrorType::CartNotFound),
    ("422", ErrorType::InvalidData),
];

pub const ADD_TO_CART_ERRORS: ErrorTable = ErrorTable::new("add_to_cart", CART_ERRORS);

pub const GET_CART_ITEMS_ERRORS: ErrorTable = ErrorTable::new("get_cart_items", CART_ERRORS);

pub const DELETE_FROM_CART_ERRORS: ErrorTable = ErrorTable::new("delete_from_cart", CART_ERRORS);

pub const BUY_CART_ERRORS: ErrorTable =
    ErrorTable::new("buy_cart", &[("422", ErrorType::CartNotFound)]);

// =============================================================================
// Login tables (keyed by login error code)
// =============================================================================

pub const LOGIN_GENERAL_ERRORS: ErrorTable = ErrorTable::new(
    "login_general",
    &[("0-004", ErrorType::InvalidProjectSettings)],
);

pub const SIGN_IN_ERRORS: ErrorTable = ErrorTable::new(
    "sign_in",
    &[
        ("003-001", ErrorType::InvalidLoginOrPassword),
        ("003-007", ErrorType::UserIsNotActivated),
        ("003-049", ErrorType::CaptchaRequired),
    ],
);

pub const REGISTRATION_ERRORS: ErrorTable = ErrorTable::new(
    "registration",
    &[
        ("010-003", ErrorType::RegistrationNotAllowed),
        ("003-003", ErrorType::UsernameIsTaken),
        ("003-004", ErrorType::EmailIsTaken),
    ],
);

pub const RESET_PASSWORD_ERRORS: ErrorTable = ErrorTable::new(
    "reset_password",
    &[
        ("003-061", ErrorType::PasswordResetNotAllowed),
        ("003-007", ErrorType::UserIsNotActivated),
    ],
);

/// Lookup scope for one call: optional call-specific table over a general one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorTables {
    pub overrides: Option<&'static ErrorTable>,
    pub general: &'static ErrorTable,
}

impl ErrorTables {
    /// Store API scope
    pub fn store(overrides: Option<&'static ErrorTable>) -> Self {
        Self {
            overrides,
            general: &GENERAL_ERRORS,
        }
    }

    /// Login API scope
    pub fn login(overrides: Option<&'static ErrorTable>) -> Self {
        Self {
            overrides,
            general: &LOGIN_GENERAL_ERRORS,
        }
    }

    fn lookup(&self, code: &str) -> Option<ErrorType> {
        self.overrides
            .and_then(|table| table.lookup(code))
            .or_else(|| self.general.lookup(code))
    }
}

impl Default for ErrorTables {
    fn default() -> Self {
        Self::store(None)
    }
}

/// Assign a category to a parsed error.
///
/// Errors without a status code are returned untouched. Matches keep the
/// vendor codes; a miss yields [`XsollaError::unknown_error`].
pub fn classify(error: XsollaError, tables: &ErrorTables) -> XsollaError {
    let error_type = match error.status() {
        Some(code) => tables.lookup(code),
        None => return error,
    };

    match error_type {
        Some(error_type) => error.with_type(error_type),
        None => XsollaError::unknown_error(),
    }
}

/// Inspect a response body for an embedded error.
///
/// `None` means the call succeeded: the body is empty, carries no error
/// object, or the error object has no status code.
pub fn check_for_errors(body: &str, tables: &ErrorTables) -> Option<XsollaError> {
    if body.trim().is_empty() {
        return None;
    }

    let error = parse_error(body)?;
    error.status()?;

    Some(classify(error, tables))
}
