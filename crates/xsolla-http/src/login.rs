//! # Login Client
//!
//! Password sign-in, registration and password reset against Xsolla Login.
//! Sign-in answers with a redirect URL; the bearer token used by the Store
//! client is carried in its `token=` query value.

use crate::config::ClientConfig;
use crate::helper::{WebRequest, WebRequestHelper};
use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, instrument, warn};
use xsolla_core::classify::{REGISTRATION_ERRORS, RESET_PASSWORD_ERRORS, SIGN_IN_ERRORS};
use xsolla_core::{
    from_json, parse_token, ErrorTable, ErrorTables, ErrorType, LoginApi, LoginUrlResponse,
    RegistrationRequest, ResetPasswordRequest, SignInRequest, Token, XsollaError, XsollaResult,
};

/// Login API client
#[derive(Debug, Clone)]
pub struct XsollaLogin {
    config: ClientConfig,
    http: WebRequestHelper,
}

impl XsollaLogin {
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

    /// POST `payload` as JSON to `path?projectId=..` and return the checked body
    async fn post<P: Serialize>(
        &self,
        path: &str,
        payload: &P,
        errors: &'static ErrorTable,
    ) -> XsollaResult<String> {
        let login_id = &self.config.settings.login_id;
        if login_id.trim().is_empty() {
            return Err(XsollaError::of_type(ErrorType::InvalidProjectSettings)
                .with_message("login_id is not configured"));
        }

        let body = serde_json::to_string(payload)
            .map_err(|e| XsollaError::unknown_error().with_message(e.to_string()))?;

        let request = WebRequest::post(self.config.login_url(path))
            .query("projectId", login_id.as_str())
            .json(body)
            .redact_response()
            .errors(ErrorTables::login(Some(errors)));

        self.http.send_text(request).await
    }
}

#[async_trait]
impl LoginApi for XsollaLogin {
    #[instrument(skip(self, password))]
    async fn sign_in(
        &self,
        username: &str,
        password: &str,
        remember_me: bool,
    ) -> XsollaResult<Token> {
        let payload = SignInRequest {
            username: username.to_string(),
            password: password.to_string(),
            remember_me,
        };

        let body = self.post("login", &payload, &SIGN_IN_ERRORS).await?;

        let response: LoginUrlResponse =
            from_json(&body).ok_or_else(XsollaError::unknown_error)?;

        let token = parse_token(&response.login_url);
        if token.is_empty() {
            warn!("No token in login URL");
            return Err(XsollaError::unknown_error());
        }

        info!("Signed in as {}", username);
        Ok(Token::new(token))
    }

    #[instrument(skip(self, password))]
    async fn registration(&self, username: &str, password: &str, email: &str) -> XsollaResult<()> {
        let payload = RegistrationRequest {
            username: username.to_string(),
            password: password.to_string(),
            email: email.to_string(),
        };

        self.post("user", &payload, &REGISTRATION_ERRORS).await?;
        info!("Registered user {}", username);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn reset_password(&self, username: &str) -> XsollaResult<()> {
        let payload = ResetPasswordRequest {
            username: username.to_string(),
        };

        self.post("password/reset/request", &payload, &RESET_PASSWORD_ERRORS)
            .await?;
        info!("Password reset requested for {}", username);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Client;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};
    use xsolla_core::XsollaSettings;

    const LOGIN_ID: &str = "e6dfaac6-78a8-11e9-9244-42010aa80004";

    fn login_for(server: &MockServer) -> XsollaLogin {
        let settings = XsollaSettings::new("44056").with_login_id(LOGIN_ID);
        let config = ClientConfig::new(settings).with_login_base_url(server.uri());
        XsollaLogin::with_helper(config, WebRequestHelper::new(Client::new()))
    }

    #[tokio::test]
    async fn test_sign_in() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .and(query_param("projectId", LOGIN_ID))
            .and(header("Content-Type", "application/json"))
            .and(body_json(json!({
                "username": "player", "password": "hunter2", "remember_me": false
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "login_url": "https://example.com/callback?token=eyJ.abc.def&remember_me=false"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let token = login_for(&server)
            .sign_in("player", "hunter2", false)
            .await
            .unwrap();
        assert_eq!(token.as_str(), "eyJ.abc.def");
    }

    #[tokio::test]
    async fn test_sign_in_wrong_password() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": {"code": "003-001", "description": "Wrong username or password"}
            })))
            .mount(&server)
            .await;

        let error = login_for(&server)
            .sign_in("player", "nope", false)
            .await
            .unwrap_err();
        assert_eq!(error.error_type, ErrorType::InvalidLoginOrPassword);
        assert_eq!(error.error_code.as_deref(), Some("003-001"));
        assert_eq!(
            error.error_message.as_deref(),
            Some("Wrong username or password")
        );
    }

    #[tokio::test]
    async fn test_sign_in_general_login_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {"code": "0-004", "description": "Invalid project"}
            })))
            .mount(&server)
            .await;

        let error = login_for(&server)
            .sign_in("player", "pw", true)
            .await
            .unwrap_err();
        assert_eq!(error.error_type, ErrorType::InvalidProjectSettings);
    }

    #[tokio::test]
    async fn test_sign_in_without_token_is_unknown() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "login_url": "https://example.com/callback"
            })))
            .mount(&server)
            .await;

        let error = login_for(&server)
            .sign_in("player", "pw", false)
            .await
            .unwrap_err();
        assert!(error.is_unknown());
    }

    #[tokio::test]
    async fn test_registration() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/user"))
            .and(query_param("projectId", LOGIN_ID))
            .and(body_json(json!({
                "username": "player", "password": "pw", "email": "p@example.com"
            })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        login_for(&server)
            .registration("player", "pw", "p@example.com")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_registration_username_taken() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/user"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "error": {"code": "003-003", "description": "Username taken"}
            })))
            .mount(&server)
            .await;

        let error = login_for(&server)
            .registration("player", "pw", "p@example.com")
            .await
            .unwrap_err();
        assert_eq!(error.error_type, ErrorType::UsernameIsTaken);
    }

    #[tokio::test]
    async fn test_reset_password() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/password/reset/request"))
            .and(body_json(json!({"username": "player"})))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/password/reset/request"))
            .and(body_json(json!({"username": "sleeper"})))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "error": {"code": "003-007", "description": "User is not activated"}
            })))
            .mount(&server)
            .await;

        let login = login_for(&server);
        login.reset_password("player").await.unwrap();

        let error = login.reset_password("sleeper").await.unwrap_err();
        assert_eq!(error.error_type, ErrorType::UserIsNotActivated);
    }

    #[tokio::test]
    async fn test_missing_login_id_short_circuits() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let config =
            ClientConfig::new(XsollaSettings::new("44056")).with_login_base_url(server.uri());
        let login = XsollaLogin::with_helper(config, WebRequestHelper::new(Client::new()));

        let error = login.reset_password("player").await.unwrap_err();
        assert_eq!(error.error_type, ErrorType::InvalidProjectSettings);
    }
}
