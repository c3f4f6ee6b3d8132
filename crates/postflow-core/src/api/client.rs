//! API client for the content automation REST API.
//!
//! `ApiClient::request` is the single call surface: it attaches the stored
//! bearer token, parses every response as JSON and enforces the session
//! expiry policy. The endpoint wrappers in `endpoints.rs` sit on top of it.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::auth::{MemoryStore, Session, SessionStore};
use crate::routing::{Location, MemoryLocation, Navigate, RouteExemptions, LOGIN_ROUTE};

use super::error::server_message;
use super::ApiError;

/// Per-call options for [`ApiClient::request`].
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<serde_json::Value>,
    /// Extra headers. They override defaults of the same name, but a stored
    /// token still wins over a caller-supplied `Authorization`.
    pub headers: Vec<(String, String)>,
    /// Do not attach the stored bearer token.
    pub skip_auth: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::get()
    }
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            body: None,
            headers: Vec::new(),
            skip_auth: false,
        }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    pub fn post(body: serde_json::Value) -> Self {
        Self::new(Method::POST).body(body)
    }

    pub fn put(body: serde_json::Value) -> Self {
        Self::new(Method::PUT).body(body)
    }

    pub fn delete() -> Self {
        Self::new(Method::DELETE)
    }

    pub fn body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn skip_auth(mut self) -> Self {
        self.skip_auth = true;
        self
    }
}

/// Serialize a request payload into a JSON body.
pub(crate) fn json_body<B: Serialize + ?Sized>(body: &B) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::InvalidRequest(e.to_string()))
}

/// Builder for [`ApiClient`]. Everything the client depends on is fixed here
/// and never changes afterwards.
pub struct ApiClientBuilder {
    base_url: String,
    store: Option<Arc<dyn SessionStore>>,
    location: Option<Arc<dyn Location>>,
    navigator: Option<Arc<dyn Navigate>>,
    exemptions: RouteExemptions,
    timeout: Option<Duration>,
    http: Option<Client>,
}

impl ApiClientBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            store: None,
            location: None,
            navigator: None,
            exemptions: RouteExemptions::default(),
            timeout: None,
            http: None,
        }
    }

    /// Session storage. Defaults to an in-memory store.
    pub fn store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Router state used for the exemption check and the redirect fallback.
    /// Defaults to an in-memory location at `/`.
    pub fn location(mut self, location: Arc<dyn Location>) -> Self {
        self.location = Some(location);
        self
    }

    /// Preferred navigation for the login redirect.
    pub fn navigator(mut self, navigator: Arc<dyn Navigate>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    /// Replace the default exempt routes (`/`, `/auth`, `/admin/dashboard`).
    pub fn exempt_routes<I, S>(mut self, routes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.exemptions = RouteExemptions::new(routes);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Reuse an existing reqwest client (and its connection pool).
    /// `timeout` is ignored when this is set.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http = Some(client);
        self
    }

    pub fn build(self) -> Result<ApiClient, ApiError> {
        let client = match self.http {
            Some(client) => client,
            None => {
                let mut builder = Client::builder();
                if let Some(timeout) = self.timeout {
                    builder = builder.timeout(timeout);
                }
                builder.build()?
            }
        };

        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryStore::new()) as Arc<dyn SessionStore>);
        let location = self
            .location
            .unwrap_or_else(|| Arc::new(MemoryLocation::default()) as Arc<dyn Location>);

        Ok(ApiClient {
            client,
            base_url: Arc::from(self.base_url.as_str()),
            session: Session::new(store),
            location,
            navigator: self.navigator,
            exemptions: Arc::new(self.exemptions),
        })
    }
}

/// Authenticated API client.
/// Clone is cheap - the reqwest client and all injected ports are shared.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Arc<str>,
    session: Session,
    location: Arc<dyn Location>,
    navigator: Option<Arc<dyn Navigate>>,
    exemptions: Arc<RouteExemptions>,
}

impl ApiClient {
    pub fn builder(base_url: impl Into<String>) -> ApiClientBuilder {
        ApiClientBuilder::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn location(&self) -> &Arc<dyn Location> {
        &self.location
    }

    /// Explicit logout. Clears the stored token and user; idempotent.
    pub fn logout(&self) -> Result<(), ApiError> {
        self.session.clear().map_err(ApiError::Storage)
    }

    fn build_headers(&self, options: &RequestOptions) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));

        for (name, value) in &options.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ApiError::InvalidHeader(format!("{}: {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ApiError::InvalidHeader(format!("{}: {}", name, e)))?;
            headers.insert(name, value);
        }

        if !options.skip_auth {
            if let Some(token) = self.session.token().map_err(ApiError::Storage)? {
                let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|e| ApiError::InvalidHeader(format!("authorization: {}", e)))?;
                value.set_sensitive(true);
                headers.insert(header::AUTHORIZATION, value);
            }
        }

        Ok(headers)
    }

    /// Issue a request against `base_url + endpoint` and decode the JSON reply.
    ///
    /// On a 401 outside the exempt routes the stored session is cleared and
    /// the user is sent to the login route before the error is returned.
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let headers = self.build_headers(&options)?;

        debug!(method = %options.method, url = %url, skip_auth = options.skip_auth, "Sending request");

        let mut request = self.client.request(options.method, &url).headers(headers);
        if let Some(ref body) = options.body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        let parsed = if bytes.iter().all(u8::is_ascii_whitespace) {
            Ok(serde_json::Value::Null)
        } else {
            serde_json::from_slice::<serde_json::Value>(&bytes)
        };

        if !status.is_success() {
            // Proxies and gateways answer with plain text or HTML
            let body = parsed.unwrap_or(serde_json::Value::Null);
            if status == reqwest::StatusCode::UNAUTHORIZED {
                return Err(self.handle_unauthorized(endpoint, &body));
            }
            let err = ApiError::from_body(status, &body);
            debug!(
                status = status.as_u16(),
                url = %url,
                message = %ApiError::truncate_body(&err.to_string()),
                "Request failed"
            );
            return Err(err);
        }

        let body = parsed.map_err(|e| {
            ApiError::InvalidResponse(format!("Status {} from {}: {}", status, endpoint, e))
        })?;
        serde_json::from_value(body)
            .map_err(|e| ApiError::InvalidResponse(format!("Unexpected payload from {}: {}", endpoint, e)))
    }

    /// Apply the session expiry policy for a 401 and build the error to return.
    fn handle_unauthorized(&self, endpoint: &str, body: &serde_json::Value) -> ApiError {
        let path = self.location.current_path();
        if self.exemptions.is_exempt(&path) {
            debug!(path = %path, endpoint = endpoint, "Unauthorized on exempt route, keeping session");
            return ApiError::from_body(reqwest::StatusCode::UNAUTHORIZED, body);
        }

        warn!(path = %path, endpoint = endpoint, "Session expired, redirecting to login");
        if let Err(e) = self.session.clear() {
            warn!(error = %e, "Failed to clear stored session");
        }
        match self.navigator {
            Some(ref navigator) => navigator.navigate(LOGIN_ROUTE),
            None => self.location.assign(LOGIN_ROUTE),
        }

        ApiError::SessionExpired {
            message: server_message(body),
        }
    }
}
