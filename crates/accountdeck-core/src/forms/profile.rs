use serde::Deserialize;

use super::fields::{char_len, FieldErrors, BIO, MIN_NAME_LENGTH, NAME};
use crate::models::{ProfileUpdate, User};

/// Values of the "Edit Profile" form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileForm {
    pub name: String,
    pub bio: String,
}

impl ProfileForm {
    pub fn new(name: impl Into<String>, bio: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bio: bio.into(),
        }
    }

    /// Seed the form from the cached profile.
    pub fn from_user(user: &User) -> Self {
        let (name, bio) = user.editable_fields();
        Self { name, bio }
    }

    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::for_fields(&[NAME, BIO]);
        if char_len(self.name.trim()) < MIN_NAME_LENGTH {
            errors.set(NAME, "Name must be at least 2 characters");
        }
        errors
    }

    /// Trimmed name, trimmed bio or `None` when the bio is blank.
    pub fn into_request(self) -> Result<ProfileUpdate, FieldErrors> {
        let errors = self.validate();
        if !errors.is_valid() {
            return Err(errors);
        }
        let bio = self.bio.trim();
        Ok(ProfileUpdate {
            name: self.name.trim().to_string(),
            bio: (!bio.is_empty()).then(|| bio.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_is_trimmed_before_length_check() {
        let errors = ProfileForm::new("  A  ", "").validate();
        assert_eq!(errors.get(NAME), "Name must be at least 2 characters");
        assert_eq!(errors.get(BIO), "");

        assert!(ProfileForm::new(" Al ", "").validate().is_valid());
    }

    #[test]
    fn test_into_request_trims_and_nulls_blank_bio() {
        let update = ProfileForm::new("  Jane ", "   ")
            .into_request()
            .expect("Form should be valid");
        assert_eq!(update.name, "Jane");
        assert_eq!(update.bio, None);

        let update = ProfileForm::new("Jane", "  Trail runner  ")
            .into_request()
            .expect("Form should be valid");
        assert_eq!(update.bio.as_deref(), Some("Trail runner"));
    }

    #[test]
    fn test_from_user() {
        let user = User {
            id: "1".to_string(),
            email: "a@b.co".to_string(),
            name: Some("Jane".to_string()),
            bio: None,
        };
        let form = ProfileForm::from_user(&user);
        assert_eq!(form.name, "Jane");
        assert_eq!(form.bio, "");
    }
}
