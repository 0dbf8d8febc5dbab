//! Client error types and status mapping.

use serde_json::Value;

/// Errors that can occur when using the Invoicebox client.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The client has not been configured, or configuration was rejected.
    #[error("API is not configured: {0}")]
    NotConfigured(String),

    /// The server returned 401.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The server returned 404.
    #[error("not found: {0}")]
    NotFound(String),

    /// The server returned 400.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The server returned any other non-200 status.
    #[error("operation failed with HTTP {status}: {message}")]
    Operation {
        /// HTTP status code.
        status: u16,
        /// Detail string from the response body.
        message: String,
    },

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Access configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// The detail string carried by a status error, if any.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Unauthorized(message)
            | Self::NotFound(message)
            | Self::InvalidRequest(message)
            | Self::Operation { message, .. } => Some(message),
            _ => None,
        }
    }

    /// The HTTP status that produced this error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized(_) => Some(401),
            Self::NotFound(_) => Some(404),
            Self::InvalidRequest(_) => Some(400),
            Self::Operation { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Extract `error.message` from a decoded response body.
///
/// Returns an empty string when the body is not an object or has no
/// string message.
#[must_use]
pub fn extract_detail(body: &Value) -> String {
    body.get("error")
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Map a response status to an outcome.
///
/// # Errors
///
/// Returns the error matching `status` for anything other than 200.
pub fn check_status(status: u16, detail: String) -> Result<(), ApiError> {
    match status {
        200 => Ok(()),
        401 => Err(ApiError::Unauthorized(detail)),
        404 => Err(ApiError::NotFound(detail)),
        400 => Err(ApiError::InvalidRequest(detail)),
        status => Err(ApiError::Operation {
            status,
            message: detail,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ok_status() {
        assert!(check_status(200, String::new()).is_ok());
    }

    #[test]
    fn mapped_statuses() {
        assert!(matches!(
            check_status(401, "bad token".into()),
            Err(ApiError::Unauthorized(m)) if m == "bad token"
        ));
        assert!(matches!(
            check_status(404, String::new()),
            Err(ApiError::NotFound(m)) if m.is_empty()
        ));
        assert!(matches!(
            check_status(400, "amount".into()),
            Err(ApiError::InvalidRequest(m)) if m == "amount"
        ));
    }

    #[test]
    fn other_statuses_are_operation_errors() {
        for status in [201, 204, 302, 403, 409, 422, 500, 503] {
            let err = check_status(status, "boom".into()).unwrap_err();
            assert!(matches!(err, ApiError::Operation { .. }), "status {status}");
            assert_eq!(err.status(), Some(status));
            assert_eq!(err.detail(), Some("boom"));
        }
    }

    #[test]
    fn extract_detail_from_error_body() {
        let body = json!({"error": {"code": "x", "message": "Shop not found"}});
        assert_eq!(extract_detail(&body), "Shop not found");
    }

    #[test]
    fn extract_detail_defaults_to_empty() {
        assert_eq!(extract_detail(&json!(null)), "");
        assert_eq!(extract_detail(&json!([1, 2])), "");
        assert_eq!(extract_detail(&json!({"error": "flat"})), "");
        assert_eq!(extract_detail(&json!({"error": {"message": 5}})), "");
        assert_eq!(extract_detail(&json!({"data": {}})), "");
    }

    #[test]
    fn not_configured_has_no_status() {
        let err = ApiError::NotConfigured("token is required".into());
        assert_eq!(err.status(), None);
        assert_eq!(err.detail(), None);
        assert_eq!(err.to_string(), "API is not configured: token is required");
    }
}
