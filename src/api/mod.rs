//! REST client for the ExoTrack API.
//!
//! * Two channels: guest (no credentials) and authorized (bearer token).
//! * Every call is a single request: no retry, no caching.
//! * Non-2xx responses surface as [`ApiError::Status`] with the decoded body.

pub mod auth;
pub mod contract;
pub mod routes;

use std::sync::RwLock;
use std::time::Duration;

use reqwest::{multipart, Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::ClientConfig;

pub use auth::AuthApi;
pub use contract::ContractApi;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server responded with status {status}: {}", .body.summary())]
    Status { status: u16, body: ErrorBody },

    #[error("authorized request attempted without a bearer token")]
    Unauthenticated,

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }

    pub fn body(&self) -> Option<&ErrorBody> {
        match self {
            ApiError::Status { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Convenience for tests and fakes.
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        ApiError::Status {
            status,
            body: ErrorBody::with_message(message),
        }
    }
}

/// The parts of an error body the client reacts to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorBody {
    pub message: Option<String>,
    pub error: Option<String>,
    pub code: Option<String>,
}

impl ErrorBody {
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn from_value(value: &Value) -> Self {
        let field = |key: &str| match value.get(key) {
            Some(Value::String(text)) if !text.is_empty() => Some(text.clone()),
            Some(Value::Number(number)) => Some(number.to_string()),
            _ => None,
        };
        match value {
            Value::String(text) if !text.is_empty() => Self::with_message(text.clone()),
            _ => Self {
                message: field("message"),
                error: field("error"),
                code: field("code"),
            },
        }
    }

    fn summary(&self) -> &str {
        self.message
            .as_deref()
            .or(self.error.as_deref())
            .unwrap_or("no message")
    }
}

/// Raw response handed back to callers untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// Decodes the `{ status, message, data }` envelope the API wraps payloads in.
    pub fn envelope<T: DeserializeOwned>(&self) -> ApiResult<Envelope<T>> {
        Ok(Envelope::deserialize(&self.body)?)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub message: Option<String>,
    pub data: T,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartValue {
    Text(String),
    File {
        file_name: String,
        mime: Option<String>,
        bytes: Vec<u8>,
    },
}

/// Ordered multipart body, inspectable before it is turned into a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartPayload {
    parts: Vec<(String, PartValue)>,
}

impl MultipartPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push_text(name, value);
        self
    }

    pub fn push_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.parts
            .push((name.into(), PartValue::Text(value.into())));
    }

    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        mime: Option<&str>,
        bytes: Vec<u8>,
    ) -> Self {
        self.parts.push((
            name.into(),
            PartValue::File {
                file_name: file_name.into(),
                mime: mime.map(str::to_string),
                bytes,
            },
        ));
        self
    }

    /// First text value recorded under `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|(key, value)| match value {
            PartValue::Text(text) if key == name => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.parts.iter().any(|(key, _)| key == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.parts.iter().map(|(key, _)| key.as_str()).collect()
    }

    pub fn parts(&self) -> &[(String, PartValue)] {
        &self.parts
    }

    pub fn into_form(self) -> ApiResult<multipart::Form> {
        let mut form = multipart::Form::new();
        for (name, value) in self.parts {
            form = match value {
                PartValue::Text(text) => form.text(name, text),
                PartValue::File {
                    file_name,
                    mime,
                    bytes,
                } => {
                    let mut part = multipart::Part::bytes(bytes).file_name(file_name);
                    if let Some(mime) = mime {
                        part = part.mime_str(&mime)?;
                    }
                    form.part(name, part)
                }
            };
        }
        Ok(form)
    }
}

pub struct ApiClient {
    http: Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> ApiResult<Self> {
        Self::build(base_url.into(), None)
    }

    pub fn from_config(config: &ClientConfig) -> ApiResult<Self> {
        Self::build(
            config.api_base_url.clone(),
            config.request_timeout_secs.map(Duration::from_secs),
        )
    }

    fn build(base_url: String, timeout: Option<Duration>) -> ApiResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: RwLock::new(None),
        })
    }

    pub fn with_token(self, token: impl Into<String>) -> Self {
        self.set_token(Some(token.into()));
        self
    }

    pub fn set_token(&self, token: Option<String>) {
        if let Ok(mut guard) = self.token.write() {
            *guard = token.filter(|value| !value.trim().is_empty());
        }
    }

    pub fn has_token(&self) -> bool {
        self.current_token().is_some()
    }

    fn current_token(&self) -> Option<String> {
        self.token.read().ok().and_then(|guard| guard.clone())
    }

    pub fn url(&self, route: &str) -> String {
        format!("{}/{}", self.base_url, route.trim_start_matches('/'))
    }

    pub(crate) fn guest(&self, method: Method, route: &str) -> RequestBuilder {
        self.http.request(method, self.url(route))
    }

    pub(crate) fn authorized(&self, method: Method, route: &str) -> ApiResult<RequestBuilder> {
        let token = self.current_token().ok_or(ApiError::Unauthenticated)?;
        Ok(self.guest(method, route).bearer_auth(token))
    }

    pub(crate) async fn send(&self, request: RequestBuilder) -> ApiResult<ApiResponse> {
        let response = request.send().await?;
        let status = response.status();
        let url = response.url().clone();
        let bytes = response.bytes().await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        if status.is_success() {
            debug!(%url, status = status.as_u16(), "API request succeeded");
            Ok(ApiResponse::new(status.as_u16(), body))
        } else {
            let body = ErrorBody::from_value(&body);
            warn!(%url, status = status.as_u16(), message = body.summary(), "API request rejected");
            Err(ApiError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }
}
