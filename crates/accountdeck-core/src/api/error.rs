use thiserror::Error;

use crate::models::ApiErrorBody;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{detail}")]
    Http { status: u16, detail: String },

    #[error("Invalid response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }

    /// Build an error from a non-2xx response. The server's `detail` field is
    /// preferred; otherwise the raw body (or the status reason) is used.
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let detail = match serde_json::from_str::<ApiErrorBody>(body) {
            Ok(parsed) => parsed.detail,
            Err(_) if body.trim().is_empty() => status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| format!("Status {}", status.as_u16())),
            Err(_) => Self::truncate_body(body),
        };
        ApiError::Http {
            status: status.as_u16(),
            detail,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Server-provided error detail, if the failure came from a response.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Http { detail, .. } => Some(detail),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Network(e) if e.is_timeout())
    }
}
