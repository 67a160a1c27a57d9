//! Utility functions for Huisuiyun operations.
//!
//! Secret derivation for the token handshake and parsing of the provider's
//! expiry timestamps.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, TimeZone, Utc};

/// Provider local time (China Standard Time) in seconds east of UTC.
pub const PROVIDER_UTC_OFFSET_SECS: i32 = 8 * 3600;

const EXPIRY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Derives the handshake secret from an access key and secret key.
///
/// The secret is the 32-character lowercase hex MD5 of the two keys
/// concatenated, access key first.
///
/// # Examples
///
/// ```
/// use huisuiyun::utils::derive_secret;
///
/// assert_eq!(derive_secret("123", "456"), "e10adc3949ba59abbe56e057f20f883e");
/// ```
pub fn derive_secret(access_key: &str, secret_key: &str) -> String {
    let digest = md5::compute(format!("{}{}", access_key, secret_key));
    hex::encode(digest.0)
}

/// Returns the provider's fixed UTC offset.
pub fn provider_offset() -> FixedOffset {
    // 8h is always within the valid offset range
    FixedOffset::east_opt(PROVIDER_UTC_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

/// Parses an expiry timestamp as reported by the token endpoint.
///
/// Accepts `YYYY-MM-DD HH:MM:SS` in provider local time, or RFC 3339.
///
/// # Examples
///
/// ```
/// use huisuiyun::utils::parse_expiry;
///
/// let at = parse_expiry("2099-01-01 00:00:00").unwrap();
/// assert_eq!(at.to_rfc3339(), "2099-01-01T00:00:00+08:00");
/// assert!(parse_expiry("tomorrow").is_none());
/// ```
pub fn parse_expiry(value: &str) -> Option<DateTime<FixedOffset>> {
    let value = value.trim();
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, EXPIRY_FORMAT) {
        return provider_offset().from_local_datetime(&naive).single();
    }
    DateTime::parse_from_rfc3339(value).ok()
}

/// Seconds from `now` until `expires_at`; negative once expired.
pub fn seconds_until(expires_at: &DateTime<FixedOffset>, now: DateTime<Utc>) -> i64 {
    expires_at.timestamp() - now.timestamp()
}

/// Gets the current Unix timestamp in seconds.
///
/// # Examples
///
/// ```
/// use huisuiyun::utils::current_timestamp;
///
/// let now = current_timestamp();
/// assert!(now > 1600000000); // After Sept 2020
/// ```
pub fn current_timestamp() -> i64 {
    Utc::now().timestamp()
}
