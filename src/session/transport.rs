/// HTTP boundary of the session layer
///
/// [`SessionClient`](super::SessionClient) builds an [`HttpRequest`] and hands it
/// to an [`HttpTransport`]. The production transport is reqwest; tests swap in
/// an in-memory fake through [`TransportFactory`].
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, SET_COOKIE};
use reqwest::Method;
use serde_json::Value;
use std::time::Duration;

use crate::errors::BotError;
use crate::logger::{self, LogTag};

/// Request payload encoding
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    /// `application/x-www-form-urlencoded`, fields in order
    Form(Vec<(String, String)>),
}

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    /// Absolute URL
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Response reduced to what the session layer inspects
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: Option<String>,
    /// Raw `Set-Cookie` header values
    pub set_cookies: Vec<String>,
    /// JSON body; non-JSON text arrives as `Value::String`, empty bodies as `None`
    pub body: Option<Value>,
}

impl HttpResponse {
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            status_text: None,
            set_cookies: Vec::new(),
            body: Some(body),
        }
    }

    pub fn with_cookie(mut self, set_cookie: impl Into<String>) -> Self {
        self.set_cookies.push(set_cookie.into());
        self
    }

    pub fn with_status_text(mut self, text: impl Into<String>) -> Self {
        self.status_text = Some(text.into());
        self
    }
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send one request; `Err` only when no HTTP response was received
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, BotError>;
}

/// Builds one transport per session, bound to an optional proxy
pub trait TransportFactory: Send + Sync {
    fn build(&self, proxy: Option<&str>) -> Result<Box<dyn HttpTransport>, BotError>;
}

// =============================================================================
// REQWEST IMPLEMENTATION
// =============================================================================

pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(proxy: Option<&str>, timeout: Duration) -> Result<Self, BotError> {
        let mut builder = reqwest::Client::builder().timeout(timeout);

        if let Some(proxy_url) = proxy {
            let proxy = reqwest::Proxy::all(proxy_url).map_err(|e| {
                BotError::transport(format!("Invalid proxy '{}': {}", proxy_url, e))
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| BotError::transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, BotError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &request.headers {
            let (Ok(name), Ok(value)) = (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) else {
                logger::debug(LogTag::Api, &format!("Dropping invalid header '{}'", name));
                continue;
            };
            headers.insert(name, value);
        }

        let mut builder = self
            .client
            .request(request.method.clone(), &request.url)
            .headers(headers);

        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Form(fields) => builder.form(fields),
        };

        let response = builder.send().await?;

        let status = response.status();
        let set_cookies = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(|v| v.to_string())
            .collect();

        let text = response.text().await?;
        let body = if text.trim().is_empty() {
            None
        } else {
            Some(serde_json::from_str(&text).unwrap_or(Value::String(text)))
        };

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().map(|s| s.to_string()),
            set_cookies,
            body,
        })
    }
}

/// Production factory: one reqwest client per session
#[derive(Debug, Clone)]
pub struct ReqwestTransportFactory {
    timeout: Duration,
}

impl ReqwestTransportFactory {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl TransportFactory for ReqwestTransportFactory {
    fn build(&self, proxy: Option<&str>) -> Result<Box<dyn HttpTransport>, BotError> {
        Ok(Box::new(ReqwestTransport::new(proxy, self.timeout)?))
    }
}
