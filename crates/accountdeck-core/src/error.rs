//! Error taxonomy for account operations.

use thiserror::Error;

use crate::api::ApiError;
use crate::auth::StorageError;
use crate::forms::FieldErrors;

#[derive(Error, Debug)]
pub enum AccountError {
    /// Local, field-scoped; never sent to the network.
    #[error("{0}")]
    Validation(FieldErrors),

    #[error(transparent)]
    Api(#[from] ApiError),

    /// The server rejected the stored token; local state has been cleared.
    #[error("Session expired - please log in again")]
    SessionExpired,

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Token storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<FieldErrors> for AccountError {
    fn from(errors: FieldErrors) -> Self {
        AccountError::Validation(errors)
    }
}

impl AccountError {
    /// Message to show the user: the server's detail when there is one,
    /// connectivity hints for transport failures, otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            AccountError::Api(ApiError::Http { detail, .. }) if !detail.is_empty() => {
                detail.clone()
            }
            AccountError::Api(e) if e.is_timeout() => {
                "Connection timed out. Please try again.".to_string()
            }
            AccountError::Api(ApiError::Network(_)) => {
                "Unable to connect to server. Check your internet connection.".to_string()
            }
            AccountError::Validation(errors) => errors.to_string(),
            AccountError::SessionExpired | AccountError::NotAuthenticated => self.to_string(),
            _ => fallback.to_string(),
        }
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            AccountError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}
