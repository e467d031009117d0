use anyhow::{Context, Result};
use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::{ApiError, ApiResult, SessionEvent, classify_reqwest_error, extract};
use crate::config::Config;
use crate::models::TokenRefresh;
use crate::session::SessionHandle;

pub(crate) const REFRESH_PATH: &str = "/api/v1/auth/refresh-token";

/// A request that can be replayed after a token refresh.
#[derive(Debug, Clone)]
pub(crate) struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(&'static str, String)>,
    body: Option<Value>,
    refresh_on_401: bool,
}

impl ApiRequest {
    pub(crate) fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            refresh_on_401: true,
        }
    }

    pub(crate) fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub(crate) fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub(crate) fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub(crate) fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub(crate) fn query(mut self, key: &'static str, value: impl ToString) -> Self {
        self.query.push((key, value.to_string()));
        self
    }

    pub(crate) fn query_opt(self, key: &'static str, value: Option<&str>) -> Self {
        match value.filter(|v| !v.is_empty()) {
            Some(v) => self.query(key, v),
            None => self,
        }
    }

    pub(crate) fn json(mut self, body: &impl Serialize) -> ApiResult<Self> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::parse(format!("Failed to encode request body: {e}")))?;
        self.body = Some(value);
        Ok(self)
    }

    fn without_refresh(mut self) -> Self {
        self.refresh_on_401 = false;
        self
    }
}

/// HTTP client for the blog backend.
///
/// Attaches the stored access token to every request. A 401 triggers one
/// refresh-token exchange followed by a single replay of the request; if the
/// refresh fails the session is cleared.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionHandle,
    events: Option<mpsc::UnboundedSender<SessionEvent>>,
}

impl ApiClient {
    /// Builds a client for the configured backend URL.
    pub fn new(config: &Config, session: SessionHandle) -> Result<Self> {
        let base_url = config.effective_api_url()?;
        Self::with_base_url(base_url, config, session)
    }

    /// Builds a client for an explicit backend URL.
    pub fn with_base_url(
        base_url: impl Into<String>,
        config: &Config,
        session: SessionHandle,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        for (name, value) in &config.http.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .with_context(|| format!("Invalid header name in config: {name}"))?;
            let value = HeaderValue::from_str(value)
                .with_context(|| format!("Invalid value for header {name}"))?;
            headers.insert(name, value);
        }

        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("quill/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers);
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
            events: None,
        })
    }

    /// Reports refreshes and forced logouts on `events`.
    #[must_use]
    pub fn with_events(mut self, events: mpsc::UnboundedSender<SessionEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    pub fn auth(&self) -> super::AuthApi<'_> {
        super::AuthApi::new(self)
    }

    pub fn blog(&self) -> super::BlogApi<'_> {
        super::BlogApi::new(self)
    }

    /// Joins `path` onto the base URL, collapsing duplicate slashes.
    fn url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        let mut joined = String::with_capacity(path.len() + 1);
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            joined.push('/');
            joined.push_str(segment);
        }
        format!("{}{joined}", self.base_url)
    }

    /// Sends `request` and returns the envelope's `data` (or `data.<field>`).
    pub(crate) async fn call<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
        field: Option<&str>,
    ) -> ApiResult<T> {
        let body = self.execute(&request).await?;
        extract(body, field)
    }

    /// Sends `request`, discarding the response body.
    pub(crate) async fn call_unit(&self, request: ApiRequest) -> ApiResult<()> {
        self.execute(&request).await.map(|_| ())
    }

    async fn execute(&self, request: &ApiRequest) -> ApiResult<Value> {
        let token = self.session.access_token();
        match self.send_once(request, token.as_deref()).await {
            Err(err) if err.is_unauthorized() && request.refresh_on_401 => {
                self.recover(request, err).await
            }
            other => other,
        }
    }

    async fn recover(&self, request: &ApiRequest, original: ApiError) -> ApiResult<Value> {
        let Some(refresh_token) = self.session.refresh_token() else {
            debug!(path = %request.path, "401 without refresh token, clearing session");
            self.drop_session();
            return Err(original);
        };

        info!(path = %request.path, "access token rejected, refreshing");
        match self.refresh(&refresh_token).await {
            Ok(refreshed) => {
                if let Err(e) = self.session.set_tokens(&refreshed.tokens) {
                    warn!("Failed to persist refreshed session: {e:#}");
                }
                let token = refreshed.tokens.access.token.clone();
                self.emit(SessionEvent::Refreshed(refreshed));
                self.send_once(request, Some(&token)).await
            }
            Err(err) => {
                warn!(error = %err, "token refresh failed, clearing session");
                self.drop_session();
                Err(original)
            }
        }
    }

    /// Exchanges a refresh token without touching the stored session.
    pub(crate) async fn refresh(&self, refresh_token: &str) -> ApiResult<TokenRefresh> {
        let request = ApiRequest::post(REFRESH_PATH)
            .json(&json!({ "refreshToken": refresh_token }))?
            .without_refresh();
        let body = self.send_once(&request, None).await?;
        extract(body, None)
    }

    async fn send_once(&self, request: &ApiRequest, token: Option<&str>) -> ApiResult<Value> {
        let url = self.url(&request.path);
        let mut builder = self.http.request(request.method.clone(), &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            warn!(method = %request.method, path = %request.path, "request failed: {e}");
            classify_reqwest_error(&e)
        })?;
        let status = response.status();
        debug!(
            method = %request.method,
            path = %request.path,
            status = status.as_u16(),
            "response"
        );
        let text = response.text().await.map_err(|e| classify_reqwest_error(&e))?;

        if !status.is_success() {
            return Err(ApiError::http_status(status.as_u16(), &text));
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| ApiError {
            status: Some(status.as_u16()),
            details: Some(text.clone()),
            ..ApiError::parse(format!("Failed to parse response JSON: {e}"))
        })
    }

    fn drop_session(&self) {
        if let Err(e) = self.session.clear() {
            warn!("Failed to clear stored session: {e:#}");
        }
        self.emit(SessionEvent::Cleared);
    }

    fn emit(&self, event: SessionEvent) {
        if let Some(events) = &self.events {
            let _ = events.send(event);
        }
    }
}
