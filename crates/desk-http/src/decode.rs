//! Turning a raw response body into an envelope.
//!
//! One rule set, applied to every response:
//! - empty body → `{ success: <2xx> }`
//! - JSON content type → must parse; an object carrying `success` is the
//!   envelope itself, anything else becomes `{ success: true, data: body }`
//! - any other content type → `{ success: <2xx>, message: <text> }`

use desk_core::{ApiResponse, FieldErrors};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;

/// Whether a `Content-Type` header value denotes JSON.
pub fn is_json_content_type(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| {
        let ct = ct.to_ascii_lowercase();
        ct.contains("application/json") || ct.contains("+json")
    })
}

/// Decode a body into an envelope.
///
/// # Errors
///
/// Returns [`ApiError::MalformedResponse`] when a JSON body does not parse or
/// carries a `success` field with the wrong shape.
pub fn decode_body(
    status: StatusCode,
    is_json: bool,
    body: &[u8],
) -> Result<ApiResponse<Value>, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ApiResponse::minimal(status.is_success(), None));
    }

    if !is_json {
        let text = String::from_utf8_lossy(body).trim().to_string();
        return Ok(ApiResponse::minimal(
            status.is_success(),
            (!text.is_empty()).then_some(text),
        ));
    }

    let value: Value = serde_json::from_slice(body)
        .map_err(|e| ApiError::MalformedResponse(format!("invalid JSON body: {e}")))?;

    let is_envelope = value.as_object().is_some_and(|obj| obj.contains_key("success"));
    if is_envelope {
        serde_json::from_value(value)
            .map_err(|e| ApiError::MalformedResponse(format!("invalid response envelope: {e}")))
    } else {
        Ok(ApiResponse::ok(value))
    }
}

/// `message` and `errors` of a non-2xx JSON body.
///
/// Read straight from the object, with or without a `success` key. Anything
/// that is not a JSON object yields nothing.
pub fn error_details(is_json: bool, body: &[u8]) -> (Option<String>, Option<FieldErrors>) {
    if !is_json {
        return (None, None);
    }
    let Ok(Value::Object(mut object)) = serde_json::from_slice::<Value>(body) else {
        return (None, None);
    };

    let message = match object.remove("message") {
        Some(Value::String(message)) if !message.trim().is_empty() => Some(message),
        _ => None,
    };
    let errors = object
        .remove("errors")
        .and_then(|errors| serde_json::from_value::<FieldErrors>(errors).ok());
    (message, errors)
}

/// Take the typed `data` out of a decoded envelope.
///
/// `Ok(None)` means a successful envelope without data.
///
/// # Errors
///
/// Returns [`ApiError::Rejected`] (message from the server, else
/// `default_message`) when `success` is false, and
/// [`ApiError::MalformedResponse`] when `data` does not decode as `T`.
pub fn expect_data<T: DeserializeOwned>(
    envelope: ApiResponse<Value>,
    default_message: &str,
) -> Result<Option<T>, ApiError> {
    if !envelope.success {
        return Err(ApiError::Rejected {
            message: envelope.failure_message(default_message),
            errors: envelope.errors,
        });
    }
    envelope
        .decode::<T>()
        .map(|typed| typed.data)
        .map_err(|e| ApiError::MalformedResponse(format!("unexpected data shape: {e}")))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn envelope_is_returned_unmodified() {
        let body = br#"{"success": false, "message": "nope", "data": {"x": 1}}"#;
        let envelope = decode_body(StatusCode::OK, true, body).unwrap();
        assert!(!envelope.success);
        assert_eq!(envelope.message.as_deref(), Some("nope"));
        assert_eq!(envelope.data, Some(json!({"x": 1})));
    }

    #[test]
    fn raw_json_is_wrapped() {
        let envelope = decode_body(StatusCode::OK, true, br#"[{"id": 1}]"#).unwrap();
        assert!(envelope.success);
        assert_eq!(envelope.data, Some(json!([{"id": 1}])));
    }

    #[test]
    fn invalid_json_is_malformed() {
        let err = decode_body(StatusCode::OK, true, b"{oops").unwrap_err();
        assert!(matches!(err, ApiError::MalformedResponse(_)));
    }

    #[test]
    fn wrongly_typed_success_is_malformed() {
        let err = decode_body(StatusCode::OK, true, br#"{"success": "yes"}"#).unwrap_err();
        assert!(matches!(err, ApiError::MalformedResponse(_)));
    }

    #[test]
    fn plain_text_becomes_minimal_envelope() {
        let envelope = decode_body(StatusCode::OK, false, b"Deleted").unwrap();
        assert!(envelope.success);
        assert_eq!(envelope.message.as_deref(), Some("Deleted"));
        assert!(envelope.data.is_none());

        let failed = decode_body(StatusCode::BAD_GATEWAY, false, b"<html>").unwrap();
        assert!(!failed.success);
    }

    #[test]
    fn empty_body_is_minimal_envelope() {
        let envelope = decode_body(StatusCode::NO_CONTENT, true, b"").unwrap();
        assert!(envelope.success);
        assert!(envelope.message.is_none());
    }

    #[test]
    fn expect_data_rejects_failed_envelopes_with_fallback_message() {
        let envelope: ApiResponse<Value> =
            serde_json::from_value(json!({"success": false, "data": {"id": 1}})).unwrap();
        let err = expect_data::<Value>(envelope, "Failed to load").unwrap_err();
        match err {
            ApiError::Rejected { message, .. } => assert_eq!(message, "Failed to load"),
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[test]
    fn expect_data_reports_shape_mismatch() {
        let envelope = ApiResponse::ok(json!("not a number"));
        let err = expect_data::<u32>(envelope, "x").unwrap_err();
        assert!(matches!(err, ApiError::MalformedResponse(_)));
    }

    #[test]
    fn expect_data_allows_missing_data() {
        let envelope = ApiResponse::<Value>::minimal(true, Some("Deleted".into()));
        assert_eq!(expect_data::<u32>(envelope, "x").unwrap(), None);
    }

    #[test]
    fn error_details_ignore_the_success_key() {
        let body =
            br#"{"message": "The name field is required.", "errors": {"name": ["required"]}}"#;
        let (message, errors) = error_details(true, body);
        assert_eq!(message.as_deref(), Some("The name field is required."));
        assert_eq!(errors.unwrap()["name"], vec!["required".to_string()]);

        assert_eq!(error_details(true, br#"{"message": "  "}"#), (None, None));
        assert_eq!(error_details(true, b"[1, 2]"), (None, None));
        assert_eq!(error_details(false, br#"{"message": "hidden"}"#), (None, None));
    }

    #[test]
    fn json_content_type_detection() {
        assert!(is_json_content_type(Some("application/json; charset=utf-8")));
        assert!(is_json_content_type(Some("application/problem+json")));
        assert!(!is_json_content_type(Some("text/html")));
        assert!(!is_json_content_type(None));
    }
}
