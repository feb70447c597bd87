use serde::Deserialize;

use super::fields::{
    check_confirmation, check_password, FieldErrors, CONFIRM_PASSWORD, NEW_PASSWORD,
    OLD_PASSWORD,
};
use crate::models::PasswordChange;

/// Values of the "Change Password" section of the settings screen.
#[derive(Clone, Default, Deserialize)]
pub struct PasswordForm {
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl PasswordForm {
    pub fn new(
        old_password: impl Into<String>,
        new_password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Self {
        Self {
            old_password: old_password.into(),
            new_password: new_password.into(),
            confirm_password: confirm_password.into(),
        }
    }

    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::for_fields(&[OLD_PASSWORD, NEW_PASSWORD, CONFIRM_PASSWORD]);
        if self.old_password.is_empty() {
            errors.set(OLD_PASSWORD, "Current password is required");
        }
        if let Some(message) = check_password(&self.new_password, "New password is required") {
            errors.set(NEW_PASSWORD, message);
        }
        if let Some(message) = check_confirmation(&self.new_password, &self.confirm_password) {
            errors.set(CONFIRM_PASSWORD, message);
        }
        errors
    }

    pub fn into_request(self) -> Result<PasswordChange, FieldErrors> {
        let errors = self.validate();
        if !errors.is_valid() {
            return Err(errors);
        }
        Ok(PasswordChange::new(self.old_password, self.new_password))
    }

    /// Blank every field, as the screen does after a successful change.
    pub fn clear(&mut self) {
        self.old_password.clear();
        self.new_password.clear();
        self.confirm_password.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_password_form() {
        let errors = PasswordForm::default().validate();
        assert_eq!(errors.get(OLD_PASSWORD), "Current password is required");
        assert_eq!(errors.get(NEW_PASSWORD), "New password is required");
        // Both empty: confirmation matches
        assert_eq!(errors.get(CONFIRM_PASSWORD), "");
    }

    #[test]
    fn test_short_new_password_and_mismatch() {
        let errors = PasswordForm::new("old-secret", "abc", "abd").validate();
        assert_eq!(errors.get(OLD_PASSWORD), "");
        assert_eq!(errors.get(NEW_PASSWORD), "Password must be at least 6 characters");
        assert_eq!(errors.get(CONFIRM_PASSWORD), "Passwords do not match");
    }

    #[test]
    fn test_valid_change() {
        let form = PasswordForm::new("old-secret", "new-secret", "new-secret");
        assert!(form.validate().is_valid());
        assert!(form.into_request().is_ok());
    }

    #[test]
    fn test_clear() {
        let mut form = PasswordForm::new("a", "b", "c");
        form.clear();
        assert!(form.old_password.is_empty());
        assert!(form.new_password.is_empty());
        assert!(form.confirm_password.is_empty());
    }
}
