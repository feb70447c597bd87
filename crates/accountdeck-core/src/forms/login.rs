use serde::Deserialize;

use super::fields::{check_email, check_password, FieldErrors, EMAIL, PASSWORD};
use crate::models::Credentials;

/// Values of the login form.
#[derive(Clone, Default, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::for_fields(&[EMAIL, PASSWORD]);
        if let Some(message) = check_email(&self.email) {
            errors.set(EMAIL, message);
        }
        if let Some(message) = check_password(&self.password, "Password is required") {
            errors.set(PASSWORD, message);
        }
        errors
    }

    pub fn into_request(self) -> Result<Credentials, FieldErrors> {
        let errors = self.validate();
        if !errors.is_valid() {
            return Err(errors);
        }
        Ok(Credentials::new(self.email, self.password))
    }
}
