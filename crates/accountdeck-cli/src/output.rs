//! Plain-text rendering of profiles, strength scores and form errors.

use accountdeck_core::strength::ProfileTip;
use accountdeck_core::utils::{bio_length_hint, strength_bar, truncate_string};
use accountdeck_core::{FieldErrors, ProfileStrength, User};

/// Longest bio shown in full by `status`.
const BIO_PREVIEW_LENGTH: usize = 60;

pub fn render_user(user: &User) -> String {
    format!(
        "Name:  {}\nEmail: {}\nBio:   {}",
        user.display_name(),
        user.email,
        user.display_bio()
    )
}

pub fn render_user_summary(user: &User) -> String {
    let avatar = user.initial().map(|c| format!("({}) ", c)).unwrap_or_default();
    format!(
        "{}{} <{}>\n{}",
        avatar,
        user.display_name(),
        user.email,
        truncate_string(user.display_bio(), BIO_PREVIEW_LENGTH)
    )
}

pub fn render_strength(strength: &ProfileStrength) -> String {
    let mut out = format!(
        "Profile strength: {} {}% ({})",
        strength_bar(strength.score),
        strength.score,
        strength.label
    );
    for tip in &strength.tips {
        let marker = if *tip == ProfileTip::Complete { "✓" } else { "-" };
        out.push_str(&format!("\n  {} {}", marker, tip));
    }
    out
}

pub fn render_bio_hint(bio: &str) -> String {
    format!("Bio: {}", bio_length_hint(bio))
}

/// One `field: message` line per failing field.
pub fn render_field_errors(errors: &FieldErrors) -> String {
    errors
        .errors()
        .map(|(field, message)| format!("  {}: {}", field, message))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use accountdeck_core::forms::SignupForm;
    use accountdeck_core::score;

    fn user(name: Option<&str>, bio: Option<&str>) -> User {
        User {
            id: "1".to_string(),
            email: "jane@example.com".to_string(),
            name: name.map(str::to_string),
            bio: bio.map(str::to_string),
        }
    }

    #[test]
    fn test_render_user_placeholders() {
        let out = render_user(&user(None, None));
        assert!(out.contains("Name:  Not set"));
        assert!(out.contains("No bio yet."));
    }

    #[test]
    fn test_render_user_summary_shows_initial() {
        let out = render_user_summary(&user(Some("jane"), Some("Hiker")));
        assert!(out.starts_with("(J) jane <jane@example.com>"));
    }

    #[test]
    fn test_render_strength_lists_tips() {
        let out = render_strength(&score("", ""));
        assert!(out.contains("0% (Weak)"));
        assert!(out.contains("- Add a name with at least 3 characters"));
        assert!(out.contains("- Add a bio with at least 20 characters"));

        let complete = render_strength(&score("Ada", &"x".repeat(60)));
        assert!(complete.contains("100% (Excellent)"));
        assert!(complete.contains("✓ Your profile is complete!"));
    }

    #[test]
    fn test_render_field_errors_skips_valid_fields() {
        let errors = SignupForm::new("Al", "", "abcdef").validate();
        assert_eq!(render_field_errors(&errors), "  email: Email is required");
    }
}
