use thiserror::Error;

/// Message used when a failed response carries no `error` field.
pub const FALLBACK_ERROR_MESSAGE: &str = "Something went wrong";

#[derive(Error, Debug)]
pub enum ApiError {
    /// 401 outside the exempt routes. The session has already been cleared
    /// and the user sent to the login route by the time this is returned.
    #[error("{message}")]
    SessionExpired { message: String },

    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("Session storage error: {0}")]
    Storage(#[source] anyhow::Error),
}

/// Maximum length for error messages written to the log
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a server message to avoid logging excessive data
    pub(crate) fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }

    /// Build the error for a non-success response from its parsed body.
    pub fn from_body(status: reqwest::StatusCode, body: &serde_json::Value) -> Self {
        ApiError::Status {
            status: status.as_u16(),
            message: server_message(body),
        }
    }

    /// HTTP status of the failed response, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::SessionExpired { .. } => Some(401),
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    pub fn is_session_expired(&self) -> bool {
        matches!(self, ApiError::SessionExpired { .. })
    }
}

/// The server's `error` field, or the fallback when it is missing or blank.
pub(crate) fn server_message(body: &serde_json::Value) -> String {
    body.get("error")
        .and_then(|e| e.as_str())
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .unwrap_or(FALLBACK_ERROR_MESSAGE)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use serde_json::json;

    #[test]
    fn test_from_body_uses_server_message() {
        let err = ApiError::from_body(StatusCode::BAD_REQUEST, &json!({"error": "Email taken"}));
        assert_eq!(err.to_string(), "Email taken");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_from_body_falls_back() {
        let err = ApiError::from_body(StatusCode::INTERNAL_SERVER_ERROR, &json!({}));
        assert_eq!(err.to_string(), FALLBACK_ERROR_MESSAGE);

        // Non-string or blank error fields also fall back
        let err = ApiError::from_body(StatusCode::BAD_REQUEST, &json!({"error": 42}));
        assert_eq!(err.to_string(), FALLBACK_ERROR_MESSAGE);
        let err = ApiError::from_body(StatusCode::BAD_REQUEST, &json!({"error": "  "}));
        assert_eq!(err.to_string(), FALLBACK_ERROR_MESSAGE);
        let err = ApiError::from_body(StatusCode::BAD_REQUEST, &serde_json::Value::Null);
        assert_eq!(err.to_string(), FALLBACK_ERROR_MESSAGE);
    }

    #[test]
    fn test_session_expired_is_unauthorized() {
        let err = ApiError::SessionExpired {
            message: "Token expired".to_string(),
        };
        assert!(err.is_unauthorized());
        assert!(err.is_session_expired());
        assert_eq!(err.to_string(), "Token expired");

        let exempt = ApiError::Status {
            status: 401,
            message: "Invalid credentials".to_string(),
        };
        assert!(exempt.is_unauthorized());
        assert!(!exempt.is_session_expired());
    }

    #[test]
    fn test_truncate_body() {
        assert_eq!(ApiError::truncate_body("short"), "short");

        let long = "é".repeat(400); // 800 bytes, 2 bytes per char
        let truncated = ApiError::truncate_body(&long);
        assert!(truncated.ends_with("(truncated, 800 total bytes)"));
        assert!(truncated.starts_with(&"é".repeat(250)));
    }
}
