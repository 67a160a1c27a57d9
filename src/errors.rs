//! Error types for the huisuiyun SDK.
//!
//! Errors fall into two kinds. Configuration errors are raised before any
//! network traffic and are fixed by the caller. Response errors cover
//! everything that happens once a request is on the wire: transport failures,
//! undecodable bodies and envelopes whose `code` is not `"200"`.

use thiserror::Error;

/// Code reported when a failure carries no HTTP status or envelope code.
pub const UNKNOWN_CODE: &str = "0";

/// Main error type for Huisuiyun operations.
#[derive(Error, Debug)]
pub enum HuisuiyunError {
    /// A required configuration field was absent
    #[error("Missing Config -- [{0}]")]
    MissingConfig(&'static str),

    /// The configured host is not an absolute URL
    #[error("Invalid host: {0}")]
    InvalidHost(#[from] url::ParseError),

    /// A call was attempted with incomplete setup (empty token, missing field)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The provider rejected the call, or the round trip failed
    #[error("{message} (code {code})")]
    Response {
        /// Envelope code, HTTP status, or `"0"` when neither is known
        code: String,
        /// Server message, or the transport's error text
        message: String,
    },
}

impl HuisuiyunError {
    /// Builds a response error from a code and message.
    pub fn response(code: impl Into<String>, message: impl Into<String>) -> Self {
        HuisuiyunError::Response {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Returns the error code for response errors.
    pub fn code(&self) -> Option<&str> {
        match self {
            HuisuiyunError::Response { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Returns `true` if the error was raised before any request was sent.
    pub fn is_configuration(&self) -> bool {
        !self.is_response()
    }

    /// Returns `true` if the error came from the transport or the envelope.
    pub fn is_response(&self) -> bool {
        matches!(self, HuisuiyunError::Response { .. })
    }
}

/// Result type alias for Huisuiyun operations.
pub type Result<T> = std::result::Result<T, HuisuiyunError>;

impl From<reqwest::Error> for HuisuiyunError {
    fn from(err: reqwest::Error) -> Self {
        let code = err
            .status()
            .map(|status| status.as_u16().to_string())
            .unwrap_or_else(|| UNKNOWN_CODE.to_string());
        HuisuiyunError::Response {
            code,
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for HuisuiyunError {
    fn from(err: serde_json::Error) -> Self {
        HuisuiyunError::response(UNKNOWN_CODE, err.to_string())
    }
}
