use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("No token available - call get_token first or pass a token explicitly")]
    MissingToken,

    #[error("{0}")]
    MissingParameter(String),

    #[error("{0}")]
    InvalidParameter(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Unauthorized - token may be invalid or expired: {0}")]
    Unauthorized(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// A required parameter that has no environment fallback
    pub fn missing(name: &str) -> Self {
        ApiError::MissingParameter(format!("{} is required", name))
    }

    /// A required parameter that may also come from an environment variable
    pub fn missing_with_env(name: &str, env_var: &str) -> Self {
        ApiError::MissingParameter(format!(
            "{} is required. Provide it as a parameter or set {} environment variable.",
            name, env_var
        ))
    }

    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let detail = if body.trim().is_empty() {
            status
                .canonical_reason()
                .unwrap_or("no response body")
                .to_string()
        } else {
            Self::truncate_body(body)
        };
        match status.as_u16() {
            401 => ApiError::Unauthorized(detail),
            403 => ApiError::AccessDenied(detail),
            404 => ApiError::NotFound(detail),
            429 => ApiError::RateLimited(detail),
            500..=599 => ApiError::ServerError(detail),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, detail)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status_maps_codes() {
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, "{}"),
            ApiError::Unauthorized(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::FORBIDDEN, "no access"),
            ApiError::AccessDenied(ref body) if body == "no access"
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::NOT_FOUND, "gone"),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::TOO_MANY_REQUESTS, ""),
            ApiError::RateLimited(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_GATEWAY, "upstream"),
            ApiError::ServerError(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_REQUEST, "bad"),
            ApiError::InvalidResponse(ref msg) if msg.contains("400")
        ));
    }

    #[test]
    fn test_empty_body_uses_status_reason() {
        let err = ApiError::from_status(StatusCode::NOT_FOUND, "  ");
        assert_eq!(err.to_string(), "Resource not found: Not Found");
    }

    #[test]
    fn test_long_body_is_truncated() {
        let body = "x".repeat(MAX_ERROR_BODY_LENGTH + 100);
        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, &body);
        let msg = err.to_string();
        assert!(msg.contains("truncated, 600 total bytes"));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let body = "é".repeat(MAX_ERROR_BODY_LENGTH);
        let truncated = ApiError::truncate_body(&body);
        assert!(truncated.contains("truncated"));
    }

    #[test]
    fn test_missing_parameter_messages() {
        assert_eq!(ApiError::missing("Block ID").to_string(), "Block ID is required");
        assert_eq!(
            ApiError::missing_with_env("Parent ID", "WOLAI_BLOCK_ID").to_string(),
            "Parent ID is required. Provide it as a parameter or set WOLAI_BLOCK_ID environment variable."
        );
    }
}
