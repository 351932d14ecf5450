//! # Store Client
//!
//! Catalogue, cart and purchase calls against the Xsolla Store API.
//! Every operation passes its own error table so that, e.g., a 404 reads as
//! `UserNotFound` when creating a cart but `CartNotFound` when filling one.

use crate::config::ClientConfig;
use crate::helper::{WebRequest, WebRequestHelper};
use async_trait::async_trait;
use tracing::{debug, info, instrument};
use xsolla_core::classify::{
    ADD_TO_CART_ERRORS, BUY_CART_ERRORS, BUY_ITEM_ERRORS, CREATE_CART_ERRORS,
    DELETE_FROM_CART_ERRORS, GET_CART_ITEMS_ERRORS, ITEMS_LIST_ERRORS,
};
use xsolla_core::{
    Cart, CartItems, ErrorTables, Groups, PurchaseData, Quantity, StoreApi, StoreItems, Token,
    VirtualCurrenciesBalance, WebRequestHeader, XsollaError, XsollaResult,
};

/// Store API client
#[derive(Debug, Clone)]
pub struct XsollaStore {
    config: ClientConfig,
    http: WebRequestHelper,
}

impl XsollaStore {
    /// Create a client on the shared request helper
    pub fn new(config: ClientConfig) -> Self {
        Self::with_helper(config, WebRequestHelper::instance().clone())
    }

    /// Create a client on a specific helper
    pub fn with_helper(config: ClientConfig, http: WebRequestHelper) -> Self {
        Self { config, http }
    }

    /// Create from environment variables
    pub fn from_env() -> XsollaResult<Self> {
        let config = ClientConfig::from_env()?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Hosted PayStation page for a purchase
    pub fn purchase_url(&self, purchase: &PurchaseData) -> String {
        self.config.settings.paystation_url(&purchase.token)
    }

    /// `v1/project/{pid}/{path..}`
    fn project_url(&self, path: &[&str]) -> XsollaResult<String> {
        let mut segments = vec![self.config.settings.store_project_id.as_str()];
        segments.extend_from_slice(path);
        Ok(self.config.store_url_segments("v1/project", &segments)?)
    }

    /// `v1/cart/{cart}`, or `v1/cart/{cart}/item/{sku}` when a SKU is given
    fn cart_url(&self, cart: &Cart, sku: Option<&str>) -> XsollaResult<String> {
        let url = match sku {
            Some(sku) => self
                .config
                .store_url_segments("v1/cart", &[cart.id.as_str(), "item", sku])?,
            None => self.config.store_url_segments("v1/cart", &[cart.id.as_str()])?,
        };
        Ok(url)
    }

    fn with_locale(&self, request: WebRequest, locale: Option<&str>) -> WebRequest {
        match locale.or(self.config.settings.locale.as_deref()) {
            Some(locale) => request.query("locale", locale),
            None => request,
        }
    }

    fn require_cart(cart: &Cart) -> XsollaResult<()> {
        if cart.id.is_empty() {
            return Err(XsollaError::of_type(xsolla_core::ErrorType::CartNotFound)
                .with_message("cart has no id"));
        }
        Ok(())
    }
}

#[async_trait]
impl StoreApi for XsollaStore {
    #[instrument(skip(self))]
    async fn get_list_of_items(&self, locale: Option<&str>) -> XsollaResult<StoreItems> {
        let request = self
            .with_locale(WebRequest::get(self.project_url(&["items", "virtual_items"])?), locale)
            .errors(ErrorTables::store(Some(&ITEMS_LIST_ERRORS)));

        let items: StoreItems = self.http.send(request).await?;
        info!("Fetched {} store items", items.len());
        Ok(items)
    }

    #[instrument(skip(self))]
    async fn get_item_groups(&self, locale: Option<&str>) -> XsollaResult<Groups> {
        let request = self
            .with_locale(WebRequest::get(self.project_url(&["items", "groups"])?), locale)
            .errors(ErrorTables::store(Some(&ITEMS_LIST_ERRORS)));

        let groups: Groups = self.http.send(request).await?;
        info!("Fetched {} item groups", groups.groups.len());
        Ok(groups)
    }

    #[instrument(skip(self, token))]
    async fn buy_item(&self, token: &Token, sku: &str) -> XsollaResult<PurchaseData> {
        let url = self.config.store_url_segments("v1/payment/item", &[sku])?;
        let request = WebRequest::post(url)
            .header(WebRequestHeader::auth_header(token.as_str()))
            .errors(ErrorTables::store(Some(&BUY_ITEM_ERRORS)));

        let purchase: PurchaseData = self.http.send(request).await?;
        info!("Purchase token issued for item {}", sku);
        Ok(purchase)
    }

    #[instrument(skip(self, token))]
    async fn create_new_cart(&self, token: &Token) -> XsollaResult<Cart> {
        let request = WebRequest::post(self.config.store_url("v1/cart"))
            .header(WebRequestHeader::auth_header(token.as_str()))
            .errors(ErrorTables::store(Some(&CREATE_CART_ERRORS)));

        let cart: Cart = self.http.send(request).await?;
        info!("Created cart {}", cart.id);
        Ok(cart)
    }

    #[instrument(skip(self, token, cart), fields(cart_id = %cart.id))]
    async fn add_item_to_cart(
        &self,
        token: &Token,
        cart: &Cart,
        sku: &str,
        quantity: u32,
    ) -> XsollaResult<()> {
        Self::require_cart(cart)?;

        let body = serde_json::to_string(&Quantity::new(quantity))
            .map_err(|e| XsollaError::unknown_error().with_message(e.to_string()))?;

        self.http
            .put_request(
                &self.cart_url(cart, Some(sku))?,
                Some(body),
                WebRequestHeader::auth_header(token.as_str()),
                Some(WebRequestHeader::content_type_json()),
                Some(&ADD_TO_CART_ERRORS),
            )
            .await?;

        debug!("Added {} x {} to cart", quantity, sku);
        Ok(())
    }

    #[instrument(skip(self, token, cart), fields(cart_id = %cart.id))]
    async fn get_cart_items(&self, token: &Token, cart: &Cart) -> XsollaResult<CartItems> {
        Self::require_cart(cart)?;

        let request = WebRequest::get(self.cart_url(cart, None)?)
            .header(WebRequestHeader::auth_header(token.as_str()))
            .errors(ErrorTables::store(Some(&GET_CART_ITEMS_ERRORS)));

        let items: CartItems = self.http.send(request).await?;
        debug!("Cart holds {} units", items.item_count());
        Ok(items)
    }

    #[instrument(skip(self, token, cart), fields(cart_id = %cart.id))]
    async fn delete_item_from_cart(
        &self,
        token: &Token,
        cart: &Cart,
        sku: &str,
    ) -> XsollaResult<()> {
        Self::require_cart(cart)?;

        self.http
            .delete_request(
                &self.cart_url(cart, Some(sku))?,
                WebRequestHeader::auth_header(token.as_str()),
                Some(&DELETE_FROM_CART_ERRORS),
            )
            .await?;

        debug!("Removed {} from cart", sku);
        Ok(())
    }

    #[instrument(skip(self, token, cart), fields(cart_id = %cart.id))]
    async fn buy_cart(&self, token: &Token, cart: &Cart) -> XsollaResult<PurchaseData> {
        Self::require_cart(cart)?;

        let url = self.config.store_url_segments("v1/payment/cart", &[cart.id.as_str()])?;
        let request = WebRequest::post(url)
            .header(WebRequestHeader::auth_header(token.as_str()))
            .errors(ErrorTables::store(Some(&BUY_CART_ERRORS)));

        let purchase: PurchaseData = self.http.send(request).await?;
        info!("Purchase token issued for cart {}", cart.id);
        Ok(purchase)
    }

    #[instrument(skip(self, token))]
    async fn get_virtual_currency_balance(
        &self,
        token: &Token,
    ) -> XsollaResult<VirtualCurrenciesBalance> {
        let request = WebRequest::get(self.project_url(&["user", "virtual_currency_balance"])?)
            .header(WebRequestHeader::auth_header(token.as_str()))
            .errors(ErrorTables::store(None));

        self.http.send(request).await
    }
}
