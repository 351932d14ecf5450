//! # xsolla-core
//!
//! Core types and traits for the Xsolla Store/Login SDK.
//!
//! This crate provides:
//! - `XsollaError` and `ErrorType` for typed error handling
//! - Static error tables and the two-tier `classify` policy
//! - `from_json` / `parse_error` / `parse_token` parse utilities
//! - `WebRequestHeader` for outgoing request headers
//! - Store, Login and PayStation data-transfer entities
//! - `XsollaSettings` for project identifiers
//! - `StoreApi`, `LoginApi` and `PayStationApi` async traits
//!
//! ## Example
//!
//! ```rust,ignore
//! use xsolla_core::{StoreApi, Cart, Token};
//!
//! let items = store.get_list_of_items(Some("en")).await?;
//! let cart = store.create_new_cart(&token).await?;
//! store.add_item_to_cart(&token, &cart, &items.items[0].sku, 1).await?;
//!
//! let purchase = store.buy_cart(&token, &cart).await?;
//! // Open settings.paystation_url(&purchase.token) in a browser
//! ```

pub mod api;
pub mod classify;
pub mod entities;
pub mod error;
pub mod header;
pub mod parse;
pub mod settings;

// Re-exports for convenience
pub use api::{BoxedLoginApi, BoxedPayStationApi, BoxedStoreApi, LoginApi, PayStationApi, StoreApi};
pub use classify::{check_for_errors, classify, ErrorTable, ErrorTables};
pub use entities::{
    Cart, CartItem, CartItems, CartPrice, Group, Groups, ItemGroup, ItemPrice, LoginUrlResponse,
    PurchaseData, Quantity, RegistrationRequest, ResetPasswordRequest, SignInRequest, StoreItem,
    StoreItems, Token, TokenRequest, VirtualCurrenciesBalance, VirtualCurrencyBalance,
};
pub use error::{ConfigError, ErrorType, XsollaError, XsollaResult};
pub use header::WebRequestHeader;
pub use parse::{from_json, parse_error, parse_token};
pub use settings::XsollaSettings;
