//! # PayStation Client
//!
//! Requests payment UI access tokens from the merchant API. The call is
//! authenticated with the merchant API key, so it belongs on a server or in
//! test tooling rather than inside a shipped game client.

use crate::config::ClientConfig;
use crate::helper::{WebRequest, WebRequestHelper};
use async_trait::async_trait;
use tracing::{info, instrument};
use xsolla_core::{
    ErrorTables, ErrorType, PayStationApi, Token, TokenRequest, WebRequestHeader, XsollaError,
    XsollaResult,
};

/// Merchant API client for PayStation tokens
#[derive(Debug, Clone)]
pub struct XsollaPayStation {
    config: ClientConfig,
    http: WebRequestHelper,
}

impl XsollaPayStation {
    /// Create a client on the shared request helper
    pub fn new(config: ClientConfig) -> Self {
        Self::with_helper(config, WebRequestHelper::instance().clone())
    }

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

    /// Fixed sandbox purchase of 9.99 USD for a test user
    pub fn test_token_request(&self) -> XsollaResult<TokenRequest> {
        let settings = &self.config.settings;
        let request = TokenRequest::new("user_test", settings.paystation_project_number()?)
            .with_email("user@test.com")
            .with_checkout(9.99, "USD");

        Ok(if settings.is_sandbox {
            request.sandbox()
        } else {
            request
        })
    }

    fn credentials(&self) -> XsollaResult<(&str, &str)> {
        let settings = &self.config.settings;
        let api_key = settings
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                XsollaError::of_type(ErrorType::InvalidProjectSettings)
                    .with_message("merchant api_key is not configured")
            })?;

        if settings.merchant_id.trim().is_empty() {
            return Err(XsollaError::of_type(ErrorType::InvalidProjectSettings)
                .with_message("merchant_id is not configured"));
        }

        Ok((settings.merchant_id.as_str(), api_key))
    }
}

#[async_trait]
impl PayStationApi for XsollaPayStation {
    #[instrument(skip(self, request), fields(project_id = request.settings.project_id))]
    async fn request_token(&self, request: &TokenRequest) -> XsollaResult<Token> {
        let (merchant_id, api_key) = self.credentials()?;

        let body = serde_json::to_string(request)
            .map_err(|e| XsollaError::unknown_error().with_message(e.to_string()))?;

        let url = self
            .config
            .merchant_url_segments("merchants", &[merchant_id, "token"])?;
        let request = WebRequest::post(url)
            .header(WebRequestHeader::auth_basic_credentials(merchant_id, api_key))
            .header(WebRequestHeader::content_type_json())
            .json(body)
            .redact_response()
            .errors(ErrorTables::store(None));

        let token: Token = self.http.send(request).await?;
        if token.is_empty() {
            return Err(XsollaError::unknown_error());
        }

        info!("PayStation token issued");
        Ok(token)
    }

    fn purchase_url(&self, token: &Token) -> String {
        self.config.settings.paystation_url(token.as_str())
    }
}
