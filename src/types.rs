//! Wire types for the Huisuiyun API.
//!
//! Every provider response is wrapped in a [`ResponseEnvelope`]. Request bodies
//! are free-form JSON objects carried by [`Params`].

use crate::errors::{HuisuiyunError, Result};
use chrono::{DateTime, FixedOffset};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Envelope code signalling success.
pub const SUCCESS_CODE: &str = "200";

/// Code assumed when the envelope carries no usable `code` field.
pub const FAILURE_CODE: &str = "1";

/// Message assumed when a failing envelope carries no `message` field.
pub const DEFAULT_MESSAGE: &str = "Invalid Response";

/// Body field promoted to the `X-Serial-Token` header.
pub const SERIAL_NO_FIELD: &str = "serialNo";

/// The uniform `{code, message, data}` wrapper around every provider response.
///
/// # Examples
///
/// ```
/// use huisuiyun::types::ResponseEnvelope;
///
/// let envelope: ResponseEnvelope =
///     serde_json::from_str(r#"{"code":"200","message":"ok","data":[1,2]}"#).unwrap();
/// assert!(envelope.is_success());
///
/// let missing: ResponseEnvelope = serde_json::from_str("{}").unwrap();
/// assert_eq!(missing.code, "1");
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    /// `"200"` on success; numeric codes are kept as their decimal text
    #[serde(default = "failure_code", deserialize_with = "deserialize_code")]
    pub code: String,

    /// Error text on failure; some endpoints reuse it for payload (token expiry)
    #[serde(default = "default_message", deserialize_with = "deserialize_message")]
    pub message: String,

    /// Endpoint-specific payload
    #[serde(default)]
    pub data: Value,
}

impl ResponseEnvelope {
    /// Returns `true` if the code is exactly `"200"`.
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    /// Converts a failing envelope into a response error.
    pub fn into_result(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(HuisuiyunError::Response {
                code: self.code,
                message: self.message,
            })
        }
    }

    /// Deserializes `data` into a caller-chosen type.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(self.data.clone())?)
    }
}

fn failure_code() -> String {
    FAILURE_CODE.to_string()
}

fn default_message() -> String {
    DEFAULT_MESSAGE.to_string()
}

fn deserialize_code<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(code)) => code,
        Some(Value::Number(code)) => code.to_string(),
        _ => failure_code(),
    })
}

fn deserialize_message<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(message)) => message,
        None | Some(Value::Null) => default_message(),
        Some(other) => other.to_string(),
    })
}

/// A JSON object of request fields.
///
/// Later insertions overwrite earlier ones, which is how caller-supplied
/// optional fields take precedence over an operation's required fields.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct Params(Map<String, Value>);

impl Params {
    /// Creates an empty parameter bag.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Adds a field, builder style.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts a field, returning the value it replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Returns a field's value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Removes a field, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Returns `true` if the field is present, even if it is `null`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Shallow-merges `other` into `self`; `other` wins on key collisions.
    pub fn merge(&mut self, other: Params) {
        self.0.extend(other.0);
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the fields.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Unwraps the underlying JSON object.
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Params {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Params {
    type Error = HuisuiyunError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self::new()),
            other => Err(HuisuiyunError::ConfigError(format!(
                "params must be a JSON object, got {}",
                other
            ))),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Builds a [`Params`] bag from `key => value` pairs.
///
/// # Examples
///
/// ```
/// use huisuiyun::params;
///
/// let params = params! {
///     "invoiceNo" => "24112000000000000001",
///     "invoiceType" => 7,
/// };
/// assert_eq!(params.len(), 2);
/// ```
#[macro_export]
macro_rules! params {
    () => {
        $crate::types::Params::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut params = $crate::types::Params::new();
        $(
            params.insert($key, $value);
        )+
        params
    }};
}

/// Body of the token exchange request.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TokenRequest {
    /// Access key as issued by the provider
    #[serde(rename = "akString")]
    pub ak_string: String,

    /// Lowercase hex MD5 of access key followed by secret key
    #[serde(rename = "secretString")]
    pub secret_string: String,

    /// Signing mode as its wire integer (1 = ISV, 2 = platform)
    #[serde(rename = "type")]
    pub mode: u8,

    /// 1 forces the provider to mint a new token, 0 reuses a live one
    #[serde(rename = "forceUpdate")]
    pub force_update: u8,
}

/// A bearer token returned by the token exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessToken {
    /// Opaque token sent as `X-Access-Token`
    pub token: String,

    /// Seconds until the provider-reported expiry; 0 if it could not be parsed
    pub expires_in: i64,

    /// Absolute expiry in provider local time, when parseable
    pub expires_at: Option<DateTime<FixedOffset>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_defaults() {
        let envelope: ResponseEnvelope = serde_json::from_str("{}").unwrap();
        assert_eq!(envelope.code, FAILURE_CODE);
        assert_eq!(envelope.message, DEFAULT_MESSAGE);
        assert_eq!(envelope.data, Value::Null);
        assert!(!envelope.is_success());
    }

    #[test]
    fn test_envelope_numeric_code() {
        let envelope: ResponseEnvelope =
            serde_json::from_str(r#"{"code":200,"message":"ok"}"#).unwrap();
        assert!(envelope.is_success());

        let envelope: ResponseEnvelope =
            serde_json::from_str(r#"{"code":null,"message":"ok"}"#).unwrap();
        assert_eq!(envelope.code, FAILURE_CODE);
    }

    #[test]
    fn test_envelope_success_is_string_exact() {
        let envelope: ResponseEnvelope =
            serde_json::from_str(r#"{"code":"200.0","message":"nope"}"#).unwrap();
        assert!(!envelope.is_success());

        let err = envelope.into_result().unwrap_err();
        assert_eq!(err.code(), Some("200.0"));
    }

    #[test]
    fn test_envelope_data_as() {
        #[derive(Deserialize)]
        struct Addressee {
            #[serde(rename = "companyName")]
            company_name: String,
        }

        let envelope: ResponseEnvelope = serde_json::from_value(json!({
            "code": "200",
            "message": "",
            "data": [{"companyName": "ACME"}]
        }))
        .unwrap();
        let list: Vec<Addressee> = envelope.data_as().unwrap();
        assert_eq!(list[0].company_name, "ACME");
        assert!(envelope.data_as::<String>().is_err());
    }

    #[test]
    fn test_params_merge_caller_wins() {
        let mut required = Params::new().with("invoiceType", 7).with("taxNo", "91310000");
        required.merge(Params::new().with("invoiceType", 8).with("remark", "x"));

        assert_eq!(required.get("invoiceType"), Some(&json!(8)));
        assert_eq!(required.get("taxNo"), Some(&json!("91310000")));
        assert_eq!(required.len(), 3);
    }

    #[test]
    fn test_params_macro_and_conversions() {
        let params = params! { "sid" => "abc", "size" => 10 };
        assert_eq!(params.get("size"), Some(&json!(10)));

        let from_value = Params::try_from(json!({"a": 1})).unwrap();
        assert_eq!(from_value.len(), 1);
        assert!(Params::try_from(Value::Null).unwrap().is_empty());
        assert!(Params::try_from(json!([1, 2])).is_err());

        let collected: Params = vec![("k", "v")].into_iter().collect();
        assert!(collected.contains_key("k"));
    }

    #[test]
    fn test_token_request_serialization() {
        let request = TokenRequest {
            ak_string: "123".to_string(),
            secret_string: "e10adc3949ba59abbe56e057f20f883e".to_string(),
            mode: 2,
            force_update: 0,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["akString"], "123");
        assert_eq!(json["type"], 2);
        assert_eq!(json["forceUpdate"], 0);
    }
}
