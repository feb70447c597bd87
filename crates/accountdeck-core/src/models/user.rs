use serde::{Deserialize, Serialize};

/// Placeholder shown when the profile has no name.
const NAME_PLACEHOLDER: &str = "Not set";

/// Placeholder shown when the profile has no bio.
const BIO_PLACEHOLDER: &str = "No bio yet. Add one to tell others about yourself!";

/// Profile of the authenticated account, as returned by `GET /profile/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

impl User {
    /// Name for display, falling back to a placeholder when unset or blank.
    pub fn display_name(&self) -> &str {
        non_blank(&self.name).unwrap_or(NAME_PLACEHOLDER)
    }

    pub fn display_bio(&self) -> &str {
        non_blank(&self.bio).unwrap_or(BIO_PLACEHOLDER)
    }

    /// Single uppercase letter for an avatar: first letter of the name,
    /// or of the email when no name is set.
    pub fn initial(&self) -> Option<char> {
        non_blank(&self.name)
            .unwrap_or(&self.email)
            .chars()
            .next()
            .and_then(|c| c.to_uppercase().next())
    }

    /// Name and bio as plain strings, the way the edit form is seeded.
    pub fn editable_fields(&self) -> (String, String) {
        (
            self.name.clone().unwrap_or_default(),
            self.bio.clone().unwrap_or_default(),
        )
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: Option<&str>, bio: Option<&str>) -> User {
        User {
            id: "u-1".to_string(),
            email: "jane@example.com".to_string(),
            name: name.map(str::to_string),
            bio: bio.map(str::to_string),
        }
    }

    #[test]
    fn test_parse_user_with_null_fields() {
        let json = r#"{"id": "42", "email": "a@b.co", "name": null, "bio": null}"#;
        let parsed: User = serde_json::from_str(json).expect("Failed to parse user JSON");
        assert_eq!(parsed.id, "42");
        assert_eq!(parsed.name, None);
        assert_eq!(parsed.bio, None);
    }

    #[test]
    fn test_parse_user_with_missing_optional_fields() {
        let json = r#"{"id": "42", "email": "a@b.co"}"#;
        let parsed: User = serde_json::from_str(json).expect("Failed to parse user JSON");
        assert_eq!(parsed.name, None);
    }

    #[test]
    fn test_display_placeholders() {
        let u = user(None, Some(""));
        assert_eq!(u.display_name(), "Not set");
        assert_eq!(u.display_bio(), BIO_PLACEHOLDER);

        let u = user(Some("Jane"), Some("Hiker"));
        assert_eq!(u.display_name(), "Jane");
        assert_eq!(u.display_bio(), "Hiker");
    }

    #[test]
    fn test_initial() {
        assert_eq!(user(Some("jane"), None).initial(), Some('J'));
        assert_eq!(user(None, None).initial(), Some('J'));
        assert_eq!(user(Some(""), None).initial(), Some('J'));

        let mut u = user(Some("émile"), None);
        assert_eq!(u.initial(), Some('É'));
        u.email = String::new();
        u.name = None;
        assert_eq!(u.initial(), None);
    }

    #[test]
    fn test_editable_fields() {
        assert_eq!(
            user(Some("Jane"), None).editable_fields(),
            ("Jane".to_string(), String::new())
        );
    }
}
