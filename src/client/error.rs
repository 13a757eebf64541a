use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// 5xx, keeping the actual status code
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ClientError {
    /// Pull the server's `error` message out of a JSON body, falling back to the raw text.
    fn message_from_body(body: &str) -> String {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
            if let Some(message) = value.get("error").and_then(|m| m.as_str()) {
                return message.to_string();
            }
        }

        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let cut = (0..=MAX_ERROR_BODY_LENGTH)
                .rev()
                .find(|&i| body.is_char_boundary(i))
                .unwrap_or(0);
            format!("{}... (truncated, {} total bytes)", &body[..cut], body.len())
        }
    }

    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = Self::message_from_body(body);
        match status.as_u16() {
            400 | 422 => ClientError::BadRequest(message),
            401 => ClientError::Unauthorized(message),
            403 => ClientError::Forbidden(message),
            409 => ClientError::Conflict(message),
            code @ 500..=599 => ClientError::Server { status: code, message },
            _ => ClientError::InvalidResponse(format!("Status {}: {}", status, message)),
        }
    }

    /// Consume a non-success response into an error.
    pub async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Self::from_status(status, &body)
    }

    /// HTTP status this error corresponds to, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::BadRequest(_) => Some(400),
            ClientError::Unauthorized(_) => Some(401),
            ClientError::Forbidden(_) => Some(403),
            ClientError::Conflict(_) => Some(409),
            ClientError::Server { status, .. } => Some(*status),
            ClientError::Network(e) => e.status().map(|s| s.as_u16()),
            ClientError::InvalidResponse(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_reads_error_field() {
        let err = ClientError::from_status(StatusCode::CONFLICT, r#"{"error":"An account with this email already exists"}"#);
        match err {
            ClientError::Conflict(message) => assert_eq!(message, "An account with this email already exists"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_from_status_mapping() {
        assert_eq!(ClientError::from_status(StatusCode::BAD_REQUEST, "").status(), Some(400));
        assert_eq!(ClientError::from_status(StatusCode::UNAUTHORIZED, "").status(), Some(401));
        assert_eq!(ClientError::from_status(StatusCode::FORBIDDEN, "").status(), Some(403));
        assert_eq!(ClientError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "").status(), Some(500));
        assert_eq!(ClientError::from_status(StatusCode::BAD_GATEWAY, "").status(), Some(502));
        assert_eq!(ClientError::from_status(StatusCode::SERVICE_UNAVAILABLE, "").status(), Some(503));
        assert!(matches!(
            ClientError::from_status(StatusCode::NOT_FOUND, "gone"),
            ClientError::InvalidResponse(_)
        ));
    }

    #[test]
    fn test_long_plain_body_is_truncated() {
        let body = "x".repeat(2000);
        match ClientError::from_status(StatusCode::INTERNAL_SERVER_ERROR, &body) {
            ClientError::Server { status, message } => {
                assert_eq!(status, 500);
                assert!(message.len() < 600);
                assert!(message.contains("truncated, 2000 total bytes"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
