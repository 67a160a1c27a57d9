//! Authenticated request execution.
//!
//! A [`Session`] pairs a [`Client`] with a token. Every business call goes
//! through [`Session::request`], which attaches the auth headers, sends the
//! request and checks the response envelope.

use crate::client::{decode_response, Client};
use crate::config::SigningMode;
use crate::errors::{HuisuiyunError, Result};
use crate::operations::Operation;
use crate::transport::HttpRequest;
use crate::types::{AccessToken, Params, ResponseEnvelope, SERIAL_NO_FIELD};
use reqwest::Method;
use serde_json::Value;
use std::fmt;

/// Header carrying the access token.
pub const ACCESS_TOKEN_HEADER: &str = "X-Access-Token";

/// Header carrying the company tax number in ISV mode.
pub const TAX_TOKEN_HEADER: &str = "X-Tax-Token";

/// Header carrying the caller's idempotency serial number.
pub const SERIAL_TOKEN_HEADER: &str = "X-Serial-Token";

/// An authenticated handle on the API.
///
/// Cloning is cheap; the configuration and transport are shared. Replacing
/// the token needs `&mut self`, so a session shared between tasks has to be
/// wrapped in a lock by the caller.
#[derive(Clone)]
pub struct Session {
    client: Client,
    token: String,
}

impl Session {
    pub(crate) fn new(client: Client, token: String) -> Self {
        Self { client, token }
    }

    /// The current access token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The client this session was opened from.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Replaces the token without contacting the provider.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = token.into();
    }

    /// Fetches a new token and swaps it in.
    ///
    /// On failure the current token is kept.
    pub async fn refresh(&mut self, force_update: bool) -> Result<AccessToken> {
        let token = self.client.fetch_token(force_update).await?;
        self.token = token.token.clone();
        Ok(token)
    }

    /// Builds the HTTP request for `path` without sending it.
    ///
    /// A `serialNo` field is moved out of the body into `X-Serial-Token`.
    pub fn build_request(&self, method: Method, path: &str, mut params: Params) -> Result<HttpRequest> {
        if self.token.is_empty() {
            return Err(HuisuiyunError::ConfigError("token is empty".to_string()));
        }

        let config = self.client.config();
        let mut headers = vec![(ACCESS_TOKEN_HEADER.to_string(), self.token.clone())];

        if config.mode() == SigningMode::Isv {
            let tax_number = config
                .tax_number()
                .ok_or(HuisuiyunError::MissingConfig("taxno"))?;
            headers.push((TAX_TOKEN_HEADER.to_string(), tax_number.to_string()));
        }

        if let Some(serial) = params.remove(SERIAL_NO_FIELD) {
            headers.push((SERIAL_TOKEN_HEADER.to_string(), header_text(serial)));
        }

        Ok(HttpRequest {
            method,
            url: config.endpoint(path)?,
            headers,
            body: Some(Value::Object(params.into_inner())),
        })
    }

    /// Sends a request to `path` and returns the full response envelope.
    ///
    /// Fails before any network call if the token is empty. Transport errors,
    /// undecodable bodies and non-`"200"` codes all surface as
    /// [`HuisuiyunError::Response`].
    pub async fn request(&self, method: Method, path: &str, params: Params) -> Result<ResponseEnvelope> {
        let request = self.build_request(method, path, params)?;
        tracing::debug!(
            method = %request.method,
            path,
            serial = request.header(SERIAL_TOKEN_HEADER).is_some(),
            "dispatching request"
        );

        let response = self.client.transport().send(request).await?;
        decode_response(response)
    }

    /// Invokes a business operation.
    ///
    /// `required` carries the operation's required fields; `params` carries
    /// optional ones and overrides `required` on key collisions.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use huisuiyun::{params, Client, ClientConfig, Operation, Params};
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = ClientConfig::new("https://api.example.com", "ak", "sk")?;
    /// let session = Client::new(config)?.authenticate(false).await?;
    ///
    /// let envelope = session
    ///     .invoke(
    ///         Operation::GetLayoutFile,
    ///         params! { "invoiceNo" => "24112000000000000001" },
    ///         Params::new(),
    ///     )
    ///     .await?;
    /// println!("{}", envelope.data);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn invoke(&self, operation: Operation, required: Params, params: Params) -> Result<ResponseEnvelope> {
        let body = operation.build_body(required, params)?;
        self.request(operation.method(), &operation.path(), body).await
    }

    /// Invokes a business operation with all fields in one bag.
    pub async fn call(&self, operation: Operation, params: Params) -> Result<ResponseEnvelope> {
        self.invoke(operation, Params::new(), params).await
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("client", &self.client)
            .field("token", &"<redacted>")
            .finish()
    }
}

fn header_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}
