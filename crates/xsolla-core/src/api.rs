//! # API Traits
//!
//! Async seams between game code and the HTTP clients. `xsolla-http`
//! provides the implementations; tests and offline builds can swap in their
//! own.
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌────────────────┐
//! │   StoreApi   │   │   LoginApi   │   │ PayStationApi  │
//! └──────┬───────┘   └──────┬───────┘   └───────┬────────┘
//!        │                  │                   │
//! ┌──────┴───────┐   ┌──────┴───────┐   ┌───────┴────────┐
//! │ XsollaStore  │   │ XsollaLogin  │   │XsollaPayStation│
//! └──────────────┘   └──────────────┘   └────────────────┘
//!                 all dispatch through WebRequestHelper
//! ```

use crate::entities::{
    Cart, CartItems, Groups, PurchaseData, StoreItems, Token, TokenRequest,
    VirtualCurrenciesBalance,
};
use crate::error::XsollaResult;
use async_trait::async_trait;
use std::sync::Arc;

/// Catalogue, cart and purchase operations
#[async_trait]
pub trait StoreApi: Send + Sync {
    /// List the project's virtual items
    async fn get_list_of_items(&self, locale: Option<&str>) -> XsollaResult<StoreItems>;

    /// List the project's item groups
    async fn get_item_groups(&self, locale: Option<&str>) -> XsollaResult<Groups>;

    /// Buy a single item; returns the PayStation token
    async fn buy_item(&self, token: &Token, sku: &str) -> XsollaResult<PurchaseData>;

    /// Create an empty cart for the user
    async fn create_new_cart(&self, token: &Token) -> XsollaResult<Cart>;

    /// Put `quantity` units of `sku` into the cart
    async fn add_item_to_cart(
        &self,
        token: &Token,
        cart: &Cart,
        sku: &str,
        quantity: u32,
    ) -> XsollaResult<()>;

    /// Read the cart's contents and total
    async fn get_cart_items(&self, token: &Token, cart: &Cart) -> XsollaResult<CartItems>;

    /// Remove `sku` from the cart
    async fn delete_item_from_cart(
        &self,
        token: &Token,
        cart: &Cart,
        sku: &str,
    ) -> XsollaResult<()>;

    /// Buy everything in the cart; returns the PayStation token
    async fn buy_cart(&self, token: &Token, cart: &Cart) -> XsollaResult<PurchaseData>;

    /// Virtual currency balances of the user
    async fn get_virtual_currency_balance(
        &self,
        token: &Token,
    ) -> XsollaResult<VirtualCurrenciesBalance>;
}

/// User authentication
#[async_trait]
pub trait LoginApi: Send + Sync {
    /// Password sign-in; yields the bearer token for Store calls
    async fn sign_in(
        &self,
        username: &str,
        password: &str,
        remember_me: bool,
    ) -> XsollaResult<Token>;

    /// Register a new user
    async fn registration(&self, username: &str, password: &str, email: &str) -> XsollaResult<()>;

    /// Send a password reset email
    async fn reset_password(&self, username: &str) -> XsollaResult<()>;
}

/// Payment UI access
#[async_trait]
pub trait PayStationApi: Send + Sync {
    /// Request an access token from the merchant API
    async fn request_token(&self, request: &TokenRequest) -> XsollaResult<Token>;

    /// Hosted payment page for a token
    fn purchase_url(&self, token: &Token) -> String;
}

pub type BoxedStoreApi = Arc<dyn StoreApi>;
pub type BoxedLoginApi = Arc<dyn LoginApi>;
pub type BoxedPayStationApi = Arc<dyn PayStationApi>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::StoreItem;
    use crate::error::{ErrorType, XsollaError};

    /// In-memory store used to check the trait is object safe and usable
    struct FixedStore {
        items: StoreItems,
    }

    #[async_trait]
    impl StoreApi for FixedStore {
        async fn get_list_of_items(&self, _locale: Option<&str>) -> XsollaResult<StoreItems> {
            Ok(self.items.clone())
        }

        async fn get_item_groups(&self, _locale: Option<&str>) -> XsollaResult<Groups> {
            Ok(Groups::default())
        }

        async fn buy_item(&self, _token: &Token, sku: &str) -> XsollaResult<PurchaseData> {
            match self.items.find(sku) {
                Some(_) => Ok(PurchaseData {
                    token: format!("ps_{}", sku),
                }),
                None => Err(XsollaError::of_type(ErrorType::ProductDoesNotExist)),
            }
        }

        async fn create_new_cart(&self, _token: &Token) -> XsollaResult<Cart> {
            Ok(Cart::new("1"))
        }

        async fn add_item_to_cart(
            &self,
            _token: &Token,
            _cart: &Cart,
            _sku: &str,
            _quantity: u32,
        ) -> XsollaResult<()> {
            Ok(())
        }

        async fn get_cart_items(&self, _token: &Token, cart: &Cart) -> XsollaResult<CartItems> {
            Ok(CartItems {
                cart_id: cart.id.clone(),
                ..Default::default()
            })
        }

        async fn delete_item_from_cart(
            &self,
            _token: &Token,
            _cart: &Cart,
            _sku: &str,
        ) -> XsollaResult<()> {
            Ok(())
        }

        async fn buy_cart(&self, _token: &Token, cart: &Cart) -> XsollaResult<PurchaseData> {
            Err(XsollaError::of_type(ErrorType::CartNotFound).with_message(cart.id.clone()))
        }

        async fn get_virtual_currency_balance(
            &self,
            _token: &Token,
        ) -> XsollaResult<VirtualCurrenciesBalance> {
            Ok(VirtualCurrenciesBalance::default())
        }
    }

    #[tokio::test]
    async fn test_store_api_object_safe() {
        let store: BoxedStoreApi = Arc::new(FixedStore {
            items: StoreItems {
                items: vec![StoreItem {
                    sku: "sword".into(),
                    ..Default::default()
                }],
            },
        });
        let token = Token::new("t");

        assert_eq!(store.buy_item(&token, "sword").await.unwrap().token, "ps_sword");
        assert_eq!(
            store.buy_item(&token, "shield").await.unwrap_err().error_type,
            ErrorType::ProductDoesNotExist
        );
        assert!(store.buy_cart(&token, &Cart::new("9")).await.is_err());
    }
}
