//! Unauthenticated client and token exchange.
//!
//! A [`Client`] knows the host, the credentials and the transport, but has no
//! token. Exchanging the credentials for a token (or supplying one) yields a
//! [`Session`], which is the only type that can call business endpoints.

use crate::config::ClientConfig;
use crate::errors::{HuisuiyunError, Result, UNKNOWN_CODE};
use crate::operations::TOKEN_PATH;
use crate::session::Session;
use crate::transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
use crate::types::{AccessToken, ResponseEnvelope, TokenRequest};
use crate::utils::{derive_secret, parse_expiry, seconds_until};
use chrono::Utc;
use reqwest::Method;
use std::fmt;
use std::sync::Arc;

/// Longest slice of a non-JSON body quoted in an error message.
const BODY_SNIPPET_LEN: usize = 200;

/// Client for the Huisuiyun API before authentication.
#[derive(Clone)]
pub struct Client {
    config: Arc<ClientConfig>,
    transport: Arc<dyn Transport>,
}

impl Client {
    /// Creates a client using the default reqwest transport.
    ///
    /// # Examples
    ///
    /// ```
    /// use huisuiyun::{Client, ClientConfig};
    ///
    /// let config = ClientConfig::new("https://api.example.com", "ak", "sk").unwrap();
    /// let client = Client::new(config).unwrap();
    /// let session = client.session("cached-token");
    /// assert_eq!(session.token(), "cached-token");
    /// ```
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::from_config(&config)?;
        Ok(Self::with_transport(config, transport))
    }

    /// Creates a client that sends every request through `transport`.
    pub fn with_transport(config: ClientConfig, transport: impl Transport + 'static) -> Self {
        Self::from_parts(config, Arc::new(transport))
    }

    /// Creates a client from a shared transport.
    pub fn from_parts(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
        }
    }

    /// The client's configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub(crate) fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    /// Builds the token exchange request without sending it.
    pub fn build_token_request(&self, force_update: bool) -> Result<HttpRequest> {
        let body = TokenRequest {
            ak_string: self.config.access_key().to_string(),
            secret_string: derive_secret(self.config.access_key(), self.config.secret_key()),
            mode: self.config.mode().as_u8(),
            force_update: u8::from(force_update),
        };

        Ok(HttpRequest {
            method: Method::POST,
            url: self.config.endpoint(TOKEN_PATH)?,
            headers: Vec::new(),
            body: Some(serde_json::to_value(body)?),
        })
    }

    /// Exchanges the AK/SK pair for an access token.
    ///
    /// With `force_update` the provider mints a new token even if the current
    /// one is still live. The caller owns refreshing before `expires_in` runs out.
    pub async fn fetch_token(&self, force_update: bool) -> Result<AccessToken> {
        let request = self.build_token_request(force_update)?;
        tracing::debug!(force_update, mode = ?self.config.mode(), "fetching access token");

        let response = self.transport.send(request).await?;
        let envelope = decode_response(response)?;

        let token = match envelope.data.as_str() {
            Some(token) if !token.is_empty() => token.to_string(),
            _ => return Err(HuisuiyunError::response(UNKNOWN_CODE, "token is empty")),
        };

        let expires_at = parse_expiry(&envelope.message);
        let expires_in = match &expires_at {
            Some(at) => seconds_until(at, Utc::now()),
            None => {
                tracing::warn!(expiry = %envelope.message, "unparsable token expiry");
                0
            }
        };

        tracing::debug!(expires_in, "access token acquired");
        Ok(AccessToken {
            token,
            expires_in,
            expires_at,
        })
    }

    /// Fetches a token and opens a session with it.
    pub async fn authenticate(&self, force_update: bool) -> Result<Session> {
        let token = self.fetch_token(force_update).await?;
        Ok(self.session(token.token))
    }

    /// Opens a session with a token obtained elsewhere, e.g. from a cache.
    ///
    /// The token is not validated; an empty token fails on first use.
    pub fn session(&self, token: impl Into<String>) -> Session {
        Session::new(self.clone(), token.into())
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Decodes a provider response into a successful envelope.
///
/// Non-2xx responses report the envelope's own failure when the body carries
/// one, and the HTTP status otherwise.
pub(crate) fn decode_response(response: HttpResponse) -> Result<ResponseEnvelope> {
    if !response.is_success() {
        if let Ok(envelope) = serde_json::from_str::<ResponseEnvelope>(&response.body) {
            if !envelope.is_success() {
                tracing::warn!(status = response.status, code = %envelope.code, "request rejected");
                return envelope.into_result();
            }
        }
        tracing::warn!(status = response.status, "unexpected HTTP status");
        return Err(HuisuiyunError::response(
            response.status.to_string(),
            format!("HTTP {}: {}", response.status, snippet(&response.body)),
        ));
    }

    let envelope: ResponseEnvelope = serde_json::from_str(&response.body)?;
    if !envelope.is_success() {
        tracing::warn!(code = %envelope.code, message = %envelope.message, "request rejected");
    }
    envelope.into_result()
}

fn snippet(body: &str) -> &str {
    match body.char_indices().nth(BODY_SNIPPET_LEN) {
        Some((end, _)) => &body[..end],
        None => body,
    }
}
