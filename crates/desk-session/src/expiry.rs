use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};

use crate::error::SessionError;

/// Decode the `exp` claim of a JWT without verifying its signature.
///
/// The payload segment may be base64url or standard base64, padded or not.
/// `exp` may be an integer or a float (seconds since the epoch).
///
/// # Errors
///
/// Returns `SessionError::InvalidToken` if the token does not have three
/// segments, the payload is not base64 JSON, or `exp` is missing or not a
/// valid timestamp.
pub fn decode_expiry(token: &str) -> Result<DateTime<Utc>, SessionError> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(SessionError::InvalidToken("invalid JWT format".into()));
    }

    let segment = parts[1].trim_end_matches('=');
    let payload = URL_SAFE_NO_PAD
        .decode(segment)
        .or_else(|_| STANDARD_NO_PAD.decode(segment))
        .map_err(|e| SessionError::InvalidToken(format!("base64 decode failed: {e}")))?;
    let value: serde_json::Value = serde_json::from_slice(&payload)
        .map_err(|e| SessionError::InvalidToken(format!("JSON parse failed: {e}")))?;
    if !value.is_object() {
        return Err(SessionError::InvalidToken("payload is not an object".into()));
    }

    let exp = &value["exp"];
    let expires_at = if let Some(secs) = exp.as_i64() {
        DateTime::from_timestamp(secs, 0)
    } else if let Some(secs) = exp.as_f64() {
        let whole = secs.floor();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let nanos = ((secs - whole) * 1e9) as u32;
        #[allow(clippy::cast_possible_truncation)]
        let whole = whole as i64;
        DateTime::from_timestamp(whole, nanos)
    } else {
        return Err(SessionError::InvalidToken("missing exp claim".into()));
    };

    expires_at.ok_or_else(|| SessionError::InvalidToken("invalid exp timestamp".into()))
}

/// Whether `token` is expired right now. Fails closed: anything that cannot
/// be decoded counts as expired.
#[must_use]
pub fn is_token_expired(token: &str) -> bool {
    is_expired_at(token, Utc::now())
}

/// Whether `token` is expired at `now`. Expired means `exp < now`.
#[must_use]
pub fn is_expired_at(token: &str, now: DateTime<Utc>) -> bool {
    match decode_expiry(token) {
        Ok(expires_at) => expires_at < now,
        Err(error) => {
            tracing::debug!(%error, "treating undecodable token as expired");
            true
        }
    }
}
