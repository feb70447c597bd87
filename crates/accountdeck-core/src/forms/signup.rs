use serde::Deserialize;

use super::fields::{check_email, check_name, check_password, FieldErrors, EMAIL, NAME, PASSWORD};
use crate::models::SignupRequest;

/// Values of the "Create Account" form.
#[derive(Clone, Default, Deserialize)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl SignupForm {
    pub fn new(name: impl Into<String>, email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::for_fields(&[NAME, EMAIL, PASSWORD]);
        if let Some(message) = check_name(&self.name) {
            errors.set(NAME, message);
        }
        if let Some(message) = check_email(&self.email) {
            errors.set(EMAIL, message);
        }
        if let Some(message) = check_password(&self.password, "Password is required") {
            errors.set(PASSWORD, message);
        }
        errors
    }

    /// Values are sent as typed; nothing is trimmed on signup.
    pub fn into_request(self) -> Result<SignupRequest, FieldErrors> {
        let errors = self.validate();
        if !errors.is_valid() {
            return Err(errors);
        }
        Ok(SignupRequest::new(self.email, self.password, self.name))
    }
}
