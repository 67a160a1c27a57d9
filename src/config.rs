//! Client configuration.
//!
//! A [`ClientConfig`] is validated once when built and is immutable afterwards.

use crate::errors::{HuisuiyunError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use url::Url;

/// Tier of the AK/SK pair, sent as `type` in the token exchange.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(into = "u8", try_from = "u8")]
pub enum SigningMode {
    /// ISV-tier keys acting for a company; every call carries `X-Tax-Token`
    Isv,
    /// Keys issued directly by the platform
    #[default]
    Platform,
}

impl SigningMode {
    /// Wire value of the mode.
    pub fn as_u8(self) -> u8 {
        match self {
            SigningMode::Isv => 1,
            SigningMode::Platform => 2,
        }
    }

    /// Returns `true` if calls in this mode need a tax number.
    pub fn requires_tax_number(self) -> bool {
        self == SigningMode::Isv
    }
}

impl From<SigningMode> for u8 {
    fn from(mode: SigningMode) -> u8 {
        mode.as_u8()
    }
}

impl TryFrom<u8> for SigningMode {
    type Error = HuisuiyunError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(SigningMode::Isv),
            2 => Ok(SigningMode::Platform),
            other => Err(HuisuiyunError::ConfigError(format!(
                "unknown signing mode: {}",
                other
            ))),
        }
    }
}

/// Connection and credential settings for a [`Client`](crate::client::Client).
#[derive(Clone)]
pub struct ClientConfig {
    host: Url,
    access_key: String,
    secret_key: String,
    mode: SigningMode,
    tax_number: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl ClientConfig {
    /// Starts building a configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use huisuiyun::config::{ClientConfig, SigningMode};
    ///
    /// let config = ClientConfig::builder()
    ///     .host("https://api.example.com")
    ///     .access_key("ak")
    ///     .secret_key("sk")
    ///     .mode(SigningMode::Isv)
    ///     .tax_number("91310000MA1FL0000X")
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(config.tax_number(), Some("91310000MA1FL0000X"));
    /// ```
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Shortcut for a platform-tier configuration.
    pub fn new(
        host: impl Into<String>,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Result<Self> {
        Self::builder()
            .host(host)
            .access_key(access_key)
            .secret_key(secret_key)
            .build()
    }

    /// Base URL of the provider.
    pub fn host(&self) -> &Url {
        &self.host
    }

    /// Access key.
    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    /// Secret key.
    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }

    /// Signing mode.
    pub fn mode(&self) -> SigningMode {
        self.mode
    }

    /// Tax number of the company an ISV acts for.
    pub fn tax_number(&self) -> Option<&str> {
        self.tax_number.as_deref()
    }

    /// Request timeout applied by the default transport.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// User agent applied by the default transport.
    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    /// Resolves an API path against the host.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.host.join(path)?)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("host", &self.host.as_str())
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("mode", &self.mode)
            .field("tax_number", &self.tax_number)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Builder for [`ClientConfig`]. Blank strings count as absent.
#[derive(Default, Clone)]
pub struct ClientConfigBuilder {
    host: Option<String>,
    access_key: Option<String>,
    secret_key: Option<String>,
    mode: SigningMode,
    tax_number: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl ClientConfigBuilder {
    /// Sets the provider base URL.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Sets the access key.
    pub fn access_key(mut self, access_key: impl Into<String>) -> Self {
        self.access_key = Some(access_key.into());
        self
    }

    /// Sets the secret key.
    pub fn secret_key(mut self, secret_key: impl Into<String>) -> Self {
        self.secret_key = Some(secret_key.into());
        self
    }

    /// Sets the signing mode.
    pub fn mode(mut self, mode: SigningMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the tax number, required in ISV mode.
    pub fn tax_number(mut self, tax_number: impl Into<String>) -> Self {
        self.tax_number = Some(tax_number.into());
        self
    }

    /// Sets the request timeout for the default transport.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the user agent for the default transport.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Validates and builds the configuration.
    pub fn build(self) -> Result<ClientConfig> {
        let host = present(self.host).ok_or(HuisuiyunError::MissingConfig("host"))?;
        let access_key = present(self.access_key).ok_or(HuisuiyunError::MissingConfig("ak"))?;
        let secret_key = present(self.secret_key).ok_or(HuisuiyunError::MissingConfig("sk"))?;
        let tax_number = present(self.tax_number);

        if self.mode.requires_tax_number() && tax_number.is_none() {
            return Err(HuisuiyunError::MissingConfig("taxno"));
        }

        Ok(ClientConfig {
            host: Url::parse(&host)?,
            access_key,
            secret_key,
            mode: self.mode,
            tax_number,
            timeout: self.timeout,
            user_agent: self.user_agent,
        })
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
