//! HTTP transport abstraction.
//!
//! Requests and responses are plain data so the request pipeline can be
//! driven by any HTTP stack. [`ReqwestTransport`] is the default.

use crate::config::ClientConfig;
use crate::errors::Result;
use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::Value;
use url::Url;

/// An outgoing HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    /// HTTP verb
    pub method: Method,

    /// Absolute URL
    pub url: Url,

    /// Header name/value pairs, in insertion order
    pub headers: Vec<(String, String)>,

    /// JSON body, if any
    pub body: Option<Value>,
}

impl HttpRequest {
    /// Returns the first header with the given name, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// A received HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,

    /// Raw response body
    pub body: String,
}

impl HttpResponse {
    /// Returns `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes one HTTP round trip.
///
/// Implementations report connection and I/O failures as errors and return
/// every received response, whatever its status, as `Ok`.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends a request and returns the response.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// [`Transport`] backed by a `reqwest::Client`.
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Creates a transport with a default client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transport honouring the timeout and user agent in `config`.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = config.user_agent() {
            builder = builder.user_agent(user_agent);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Uses a custom HTTP client.
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = self.client.request(request.method, request.url);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(HttpResponse { status, body })
    }
}
