//! # Web Request Helper
//!
//! Process-wide request dispatcher shared by every client.
//!
//! Each call is issued exactly once and resolves to exactly one outcome:
//!
//! ```text
//!  send ──► transport failed? ──yes──► NetworkError
//!                 │no
//!                 ▼
//!          check_for_errors(body) ──error──► classified XsollaError
//!                 │none
//!                 ▼
//!           from_json::<T>(body) ──None──► UnknownError
//!                 │
//!                 ▼
//!               Ok(T)
//! ```
//!
//! There are no retries and no cancellation. Concurrent calls complete
//! independently, in no particular order.

use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use std::sync::OnceLock;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};
use xsolla_core::{
    check_for_errors, from_json, ErrorTable, ErrorTables, WebRequestHeader, XsollaError,
    XsollaResult,
};

/// Body of an outgoing request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestBody {
    #[default]
    Empty,
    /// `application/x-www-form-urlencoded` fields
    Form(Vec<(String, String)>),
    /// Raw JSON text
    Json(String),
}

/// A single API call: target, headers, body and the error tables to apply
#[derive(Debug, Clone)]
pub struct WebRequest {
    method: Method,
    url: String,
    headers: Vec<WebRequestHeader>,
    query: Vec<(String, String)>,
    body: RequestBody,
    tables: ErrorTables,
    redact_response: bool,
}

impl WebRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            query: Vec::new(),
            body: RequestBody::Empty,
            tables: ErrorTables::default(),
            redact_response: false,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::PUT, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::DELETE, url)
    }

    /// Builder: attach a header
    pub fn header(mut self, header: WebRequestHeader) -> Self {
        self.headers.push(header);
        self
    }

    /// Builder: attach a header if present
    pub fn header_opt(self, header: Option<WebRequestHeader>) -> Self {
        match header {
            Some(h) => self.header(h),
            None => self,
        }
    }

    /// Builder: append a query parameter
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Builder: send form fields
    pub fn form(mut self, fields: Vec<(String, String)>) -> Self {
        self.body = RequestBody::Form(fields);
        self
    }

    /// Builder: send raw JSON text
    pub fn json(mut self, json: impl Into<String>) -> Self {
        self.body = RequestBody::Json(json.into());
        self
    }

    /// Builder: set the classification scope
    pub fn errors(mut self, tables: ErrorTables) -> Self {
        self.tables = tables;
        self
    }

    /// Builder: keep the response body out of the logs (it carries a token)
    pub fn redact_response(mut self) -> Self {
        self.redact_response = true;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn headers(&self) -> &[WebRequestHeader] {
        &self.headers
    }

    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    pub fn tables(&self) -> &ErrorTables {
        &self.tables
    }

    pub fn is_response_redacted(&self) -> bool {
        self.redact_response
    }
}

static INSTANCE: OnceLock<WebRequestHelper> = OnceLock::new();

/// Issues requests and maps responses onto `XsollaResult`
#[derive(Debug, Clone)]
pub struct WebRequestHelper {
    client: Client,
}

impl WebRequestHelper {
    /// The shared helper, created on first use and kept for the process lifetime
    pub fn instance() -> &'static WebRequestHelper {
        INSTANCE.get_or_init(|| {
            info!("Creating shared WebRequestHelper");
            Self::new(Client::new())
        })
    }

    /// A standalone helper around a custom client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Perform the call and return the body text.
    ///
    /// Only transport failures are reported here; the status line is logged
    /// but classification is left to the body.
    #[instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    async fn execute(&self, request: &WebRequest) -> XsollaResult<String> {
        debug!("HTTP {} request to: {}", request.method, request.url);

        let mut builder = self.client.request(request.method.clone(), &request.url);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        for header in &request.headers {
            builder = builder.header(header.name(), header.value());
        }

        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Form(fields) => builder.form(fields),
            RequestBody::Json(json) if json.is_empty() => builder,
            RequestBody::Json(json) => {
                if !request
                    .headers
                    .iter()
                    .any(|h| h.name().eq_ignore_ascii_case("content-type"))
                {
                    let content = WebRequestHeader::content_type_json();
                    builder = builder.header(content.name(), content.value());
                }
                builder.body(json.clone())
            }
        };

        let response = builder.send().await.map_err(|e| {
            error!("{} request failed: {}", request.method, e);
            XsollaError::network_error()
        })?;

        let status = response.status();
        debug!("Response status: {}", status);

        let body = response.text().await.map_err(|e| {
            error!("Failed to read response body: {}", e);
            XsollaError::network_error()
        })?;

        debug!("Response body: {}", loggable_body(request, &body));

        Ok(body)
    }

    fn check(body: &str, tables: &ErrorTables) -> XsollaResult<()> {
        match check_for_errors(body, tables) {
            Some(error) => {
                warn!("API error: {}", error);
                Err(error)
            }
            None => Ok(()),
        }
    }

    /// Issue the call and deserialize the payload
    pub async fn send<T: DeserializeOwned>(&self, request: WebRequest) -> XsollaResult<T> {
        let body = self.execute(&request).await?;
        Self::check(&body, &request.tables)?;

        from_json::<T>(&body).ok_or_else(XsollaError::unknown_error)
    }

    /// Issue the call when no payload is expected
    pub async fn send_unit(&self, request: WebRequest) -> XsollaResult<()> {
        let body = self.execute(&request).await?;
        Self::check(&body, &request.tables)
    }

    /// Issue the call and hand back the raw body after error checking
    pub async fn send_text(&self, request: WebRequest) -> XsollaResult<String> {
        let body = self.execute(&request).await?;
        Self::check(&body, &request.tables)?;
        Ok(body)
    }

    /// Run the call as a background task and report through callbacks.
    ///
    /// Exactly one of `on_complete` or `on_error` runs, once. Must be called
    /// from within a tokio runtime.
    pub fn spawn<T, S, E>(&self, request: WebRequest, on_complete: S, on_error: E) -> JoinHandle<()>
    where
        T: DeserializeOwned + Send + 'static,
        S: FnOnce(T) + Send + 'static,
        E: FnOnce(XsollaError) + Send + 'static,
    {
        let helper = self.clone();
        tokio::spawn(async move {
            match helper.send::<T>(request).await {
                Ok(data) => on_complete(data),
                Err(error) => on_error(error),
            }
        })
    }

    /// Callback form of [`send_unit`](Self::send_unit)
    pub fn spawn_unit<S, E>(&self, request: WebRequest, on_complete: S, on_error: E) -> JoinHandle<()>
    where
        S: FnOnce() + Send + 'static,
        E: FnOnce(XsollaError) + Send + 'static,
    {
        let helper = self.clone();
        tokio::spawn(async move {
            match helper.send_unit(request).await {
                Ok(()) => on_complete(),
                Err(error) => on_error(error),
            }
        })
    }

    // =========================================================================
    // Convenience wrappers
    // =========================================================================

    /// GET with an optional auth header
    pub async fn get_request<T: DeserializeOwned>(
        &self,
        url: &str,
        request_header: Option<WebRequestHeader>,
        errors_to_check: Option<&'static ErrorTable>,
    ) -> XsollaResult<T> {
        let request = WebRequest::get(url)
            .header_opt(request_header)
            .errors(ErrorTables::store(errors_to_check));
        self.send(request).await
    }

    /// POST form fields
    pub async fn post_request<T: DeserializeOwned>(
        &self,
        url: &str,
        form: Vec<(String, String)>,
        request_header: WebRequestHeader,
        errors_to_check: Option<&'static ErrorTable>,
    ) -> XsollaResult<T> {
        let request = WebRequest::post(url)
            .header(request_header)
            .form(form)
            .errors(ErrorTables::store(errors_to_check));
        self.send(request).await
    }

    /// PUT a JSON body; no payload is expected back
    pub async fn put_request(
        &self,
        url: &str,
        json_data: Option<String>,
        auth_header: WebRequestHeader,
        content_header: Option<WebRequestHeader>,
        errors_to_check: Option<&'static ErrorTable>,
    ) -> XsollaResult<()> {
        let mut request = WebRequest::put(url)
            .header(auth_header)
            .header_opt(content_header)
            .errors(ErrorTables::store(errors_to_check));
        if let Some(json) = json_data {
            request = request.json(json);
        }
        self.send_unit(request).await
    }

    /// DELETE; no payload is expected back
    pub async fn delete_request(
        &self,
        url: &str,
        auth_header: WebRequestHeader,
        errors_to_check: Option<&'static ErrorTable>,
    ) -> XsollaResult<()> {
        let request = WebRequest::delete(url)
            .header(auth_header)
            .errors(ErrorTables::store(errors_to_check));
        self.send_unit(request).await
    }
}

fn loggable_body<'a>(request: &WebRequest, body: &'a str) -> std::borrow::Cow<'a, str> {
    if request.redact_response {
        format!("<redacted, {} bytes>", body.len()).into()
    } else {
        body.into()
    }
}

impl Default for WebRequestHelper {
    fn default() -> Self {
        Self::instance().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;
    use wiremock::matchers::{body_json, body_string, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};
    use xsolla_core::classify::{ADD_TO_CART_ERRORS, CREATE_CART_ERRORS, ITEMS_LIST_ERRORS};
    use xsolla_core::ErrorType;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Payload {
        id: String,
    }

    fn helper() -> WebRequestHelper {
        WebRequestHelper::new(Client::new())
    }

    #[test]
    fn test_singleton_is_shared() {
        let a = WebRequestHelper::instance() as *const _;
        let b = WebRequestHelper::instance() as *const _;
        assert_eq!(a, b);
    }

    #[test]
    fn test_request_builder() {
        let request = WebRequest::put("http://x/cart")
            .header(WebRequestHeader::auth_header("t"))
            .header_opt(None)
            .json(r#"{"quantity":1}"#)
            .errors(ErrorTables::store(Some(&ADD_TO_CART_ERRORS)));

        assert_eq!(request.method(), &Method::PUT);
        assert_eq!(request.headers().len(), 1);
        assert_eq!(request.body(), &RequestBody::Json(r#"{"quantity":1}"#.into()));
        assert_eq!(request.tables().overrides, Some(&ADD_TO_CART_ERRORS));
    }

    #[test]
    fn test_redacted_response_body() {
        let body = r#"{"token":"ps-secret"}"#;

        let plain = WebRequest::post("http://x/token");
        assert!(!plain.is_response_redacted());
        assert_eq!(loggable_body(&plain, body), body);

        let redacted = WebRequest::post("http://x/token").redact_response();
        assert!(redacted.is_response_redacted());
        let logged = loggable_body(&redacted, body);
        assert!(!logged.contains("ps-secret"));
        assert_eq!(logged, "<redacted, 21 bytes>");
    }

    #[tokio::test]
    async fn test_send_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/items"))
            .and(query_param("locale", "en"))
            .and(header("Authorization", "Bearer abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "42"})))
            .expect(1)
            .mount(&server)
            .await;

        let request = WebRequest::get(format!("{}/items", server.uri()))
            .query("locale", "en")
            .header(WebRequestHeader::auth_header("abc"));
        let payload: Payload = helper().send(request).await.unwrap();

        assert_eq!(payload, Payload { id: "42".into() });
    }

    #[tokio::test]
    async fn test_transport_failure_is_network_error() {
        // Nothing listens on port 1
        let request = WebRequest::get("http://127.0.0.1:1/items");
        let error = helper().send::<Payload>(request).await.unwrap_err();

        assert_eq!(error, XsollaError::network_error());
    }

    #[tokio::test]
    async fn test_body_error_uses_call_specific_table() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/cart"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "statusCode": 404,
                "errorCode": 4001,
                "errorMessage": "User not found"
            })))
            .mount(&server)
            .await;

        let request = WebRequest::post(format!("{}/cart", server.uri()))
            .errors(ErrorTables::store(Some(&CREATE_CART_ERRORS)));
        let error = helper().send::<Payload>(request).await.unwrap_err();

        assert_eq!(error.error_type, ErrorType::UserNotFound);
        assert_eq!(error.error_code.as_deref(), Some("4001"));
    }

    #[tokio::test]
    async fn test_unclassified_body_error_is_unknown() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/items"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "statusCode": 500,
                "errorMessage": "Internal"
            })))
            .mount(&server)
            .await;

        let request = WebRequest::get(format!("{}/items", server.uri()))
            .errors(ErrorTables::store(Some(&ITEMS_LIST_ERRORS)));
        let error = helper().send::<Payload>(request).await.unwrap_err();

        assert_eq!(error, XsollaError::unknown_error());
    }

    #[tokio::test]
    async fn test_unparseable_payload_is_unknown() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let error = helper()
            .send::<Payload>(WebRequest::get(server.uri()))
            .await
            .unwrap_err();
        assert!(error.is_unknown());
    }

    #[tokio::test]
    async fn test_send_unit_ignores_payload() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/cart/1/item/sword"))
            .and(header("Content-Type", "application/json"))
            .and(body_json(json!({"quantity": 2})))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let result = helper()
            .put_request(
                &format!("{}/cart/1/item/sword", server.uri()),
                Some(r#"{"quantity":2}"#.to_string()),
                WebRequestHeader::auth_header("t"),
                Some(WebRequestHeader::content_type_json()),
                Some(&ADD_TO_CART_ERRORS),
            )
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_delete_reports_cart_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(header("Authorization", "Bearer t"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"statusCode": "404"})))
            .mount(&server)
            .await;

        let error = helper()
            .delete_request(
                &format!("{}/cart/1/item/sword", server.uri()),
                WebRequestHeader::auth_header("t"),
                Some(&ADD_TO_CART_ERRORS),
            )
            .await
            .unwrap_err();

        assert_eq!(error.error_type, ErrorType::CartNotFound);
    }

    #[tokio::test]
    async fn test_post_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/form"))
            .and(body_string("a=1&b=two"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "ok"})))
            .expect(1)
            .mount(&server)
            .await;

        let payload: Payload = helper()
            .post_request(
                &format!("{}/form", server.uri()),
                vec![("a".into(), "1".into()), ("b".into(), "two".into())],
                WebRequestHeader::auth_header("t"),
                None,
            )
            .await
            .unwrap();

        assert_eq!(payload.id, "ok");
    }

    #[tokio::test]
    async fn test_general_table_applies_without_override() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({"statusCode": 403})))
            .mount(&server)
            .await;

        let error = helper()
            .get_request::<Payload>(&server.uri(), None, None)
            .await
            .unwrap_err();
        assert_eq!(error.error_type, ErrorType::InvalidToken);
    }

    #[tokio::test]
    async fn test_spawn_invokes_exactly_one_callback() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "7"})))
            .mount(&server)
            .await;

        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<Result<String, ErrorType>>();

        let ok_tx = tx.clone();
        let err_tx = tx.clone();
        helper()
            .spawn::<Payload, _, _>(
                WebRequest::get(format!("{}/ok", server.uri())),
                move |p| {
                    let _ = ok_tx.send(Ok(p.id));
                },
                move |e| {
                    let _ = err_tx.send(Err(e.error_type));
                },
            )
            .await
            .unwrap();

        let ok_tx = tx.clone();
        let err_tx = tx.clone();
        helper()
            .spawn::<Payload, _, _>(
                WebRequest::get("http://127.0.0.1:1/down"),
                move |p| {
                    let _ = ok_tx.send(Ok(p.id));
                },
                move |e| {
                    let _ = err_tx.send(Err(e.error_type));
                },
            )
            .await
            .unwrap();

        drop(tx);

        let mut outcomes = Vec::new();
        while let Some(outcome) = rx.recv().await {
            outcomes.push(outcome);
        }
        assert_eq!(
            outcomes,
            vec![Ok("7".to_string()), Err(ErrorType::NetworkError)]
        );
    }

    #[tokio::test]
    async fn test_spawn_unit_reports_error() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({"statusCode": 422})))
            .mount(&server)
            .await;

        let (tx, rx) = tokio::sync::oneshot::channel();
        helper()
            .spawn_unit(
                WebRequest::delete(server.uri()).errors(ErrorTables::store(Some(&ADD_TO_CART_ERRORS))),
                || panic!("unexpected success"),
                move |e| {
                    let _ = tx.send(e.error_type);
                },
            )
            .await
            .unwrap();

        assert_eq!(rx.await.unwrap(), ErrorType::InvalidData);
    }
}
