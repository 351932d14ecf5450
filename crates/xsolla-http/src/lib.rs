//! # xsolla-http
//!
//! reqwest-backed implementations of the `xsolla-core` API traits.
//!
//! ## Setup
//!
//! ```bash
//! export XSOLLA_STORE_PROJECT_ID=44056
//! export XSOLLA_LOGIN_ID=e6dfaac6-78a8-11e9-9244-42010aa80004
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use xsolla_core::{LoginApi, StoreApi};
//! use xsolla_http::{ClientConfig, XsollaLogin, XsollaStore};
//!
//! let config = ClientConfig::from_env()?;
//! let login = XsollaLogin::new(config.clone());
//! let store = XsollaStore::new(config);
//!
//! let token = login.sign_in("player", "password", false).await?;
//! let cart = store.create_new_cart(&token).await?;
//! ```

pub mod config;
pub mod helper;
pub mod login;
pub mod paystation;
pub mod store;

pub use config::ClientConfig;
pub use helper::{RequestBody, WebRequest, WebRequestHelper};
pub use login::XsollaLogin;
pub use paystation::XsollaPayStation;
pub use store::XsollaStore;
