//! Profile completeness heuristic.
//!
//! Scores a profile from 0 to 100 using only the trimmed lengths of its name
//! and bio: up to 30 points for the name and up to 70 for the bio, with the
//! full bio credit reserved for the 50-200 character range.

use std::fmt;

use serde::Serialize;

use crate::forms::fields::char_len;

const NAME_FULL_LENGTH: usize = 3;
const NAME_FULL_POINTS: u32 = 30;
const NAME_PARTIAL_POINTS: u32 = 15;

const BIO_MIN_LENGTH: usize = 20;
const BIO_OPTIMAL_MIN: usize = 50;
const BIO_OPTIMAL_MAX: usize = 200;
const BIO_BASE_POINTS: u32 = 40;
const BIO_OPTIMAL_BONUS: u32 = 30;
const BIO_LONG_BONUS: u32 = 15;

pub const MAX_SCORE: u8 = 100;

/// Scores below this are weak.
const GOOD_THRESHOLD: u8 = 34;
/// Scores at or above this are excellent.
const EXCELLENT_THRESHOLD: u8 = 67;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub enum StrengthLabel {
    Weak,
    Good,
    Excellent,
}

impl StrengthLabel {
    pub fn from_score(score: u8) -> Self {
        if score < GOOD_THRESHOLD {
            StrengthLabel::Weak
        } else if score < EXCELLENT_THRESHOLD {
            StrengthLabel::Good
        } else {
            StrengthLabel::Excellent
        }
    }
}

impl fmt::Display for StrengthLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrengthLabel::Weak => write!(f, "Weak"),
            StrengthLabel::Good => write!(f, "Good"),
            StrengthLabel::Excellent => write!(f, "Excellent"),
        }
    }
}

/// Improvement hints, listed in the order they are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub enum ProfileTip {
    NameTooShort,
    BioTooShort,
    BioNeedsDetail,
    BioTooLong,
    Complete,
}

impl ProfileTip {
    pub fn message(&self) -> &'static str {
        match self {
            ProfileTip::NameTooShort => "Add a name with at least 3 characters",
            ProfileTip::BioTooShort => "Add a bio with at least 20 characters",
            ProfileTip::BioNeedsDetail => {
                "Make your bio more detailed (50-200 characters is optimal)"
            }
            ProfileTip::BioTooLong => "Consider shortening your bio (50-200 characters is optimal)",
            ProfileTip::Complete => "Your profile is complete!",
        }
    }
}

impl fmt::Display for ProfileTip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct ProfileStrength {
    pub score: u8,
    pub label: StrengthLabel,
    pub tips: Vec<ProfileTip>,
}

fn name_points(name_len: usize) -> u32 {
    match name_len {
        0 => 0,
        n if n >= NAME_FULL_LENGTH => NAME_FULL_POINTS,
        _ => NAME_PARTIAL_POINTS,
    }
}

/// The partial-credit arithmetic runs in f64 in this exact order so results
/// match the established scores bit for bit.
fn bio_points(bio_len: usize) -> u32 {
    if bio_len >= BIO_MIN_LENGTH {
        let bonus = if (BIO_OPTIMAL_MIN..=BIO_OPTIMAL_MAX).contains(&bio_len) {
            BIO_OPTIMAL_BONUS
        } else if bio_len >= BIO_OPTIMAL_MAX {
            BIO_LONG_BONUS
        } else {
            ((bio_len - BIO_MIN_LENGTH) as f64 / 30.0 * 30.0).floor() as u32
        };
        BIO_BASE_POINTS + bonus
    } else if bio_len > 0 {
        (bio_len as f64 / 20.0 * 40.0).floor() as u32
    } else {
        0
    }
}

/// Score a profile. Pure: identical inputs always give identical output.
pub fn score(name: &str, bio: &str) -> ProfileStrength {
    let name_len = char_len(name.trim());
    let bio_len = char_len(bio.trim());

    let total = (name_points(name_len) + bio_points(bio_len)).min(u32::from(MAX_SCORE));
    let score = total as u8;

    let mut tips = Vec::new();
    if name_len < NAME_FULL_LENGTH {
        tips.push(ProfileTip::NameTooShort);
    }
    if bio_len < BIO_MIN_LENGTH {
        tips.push(ProfileTip::BioTooShort);
    }
    if (BIO_MIN_LENGTH..BIO_OPTIMAL_MIN).contains(&bio_len) {
        tips.push(ProfileTip::BioNeedsDetail);
    }
    if bio_len > BIO_OPTIMAL_MAX {
        tips.push(ProfileTip::BioTooLong);
    }
    if score == MAX_SCORE {
        tips.push(ProfileTip::Complete);
    }

    ProfileStrength {
        score,
        label: StrengthLabel::from_score(score),
        tips,
    }
}

/// Whether the bio, as typed, sits in the optimal 50-200 character window.
/// Unlike `score`, this looks at the untrimmed text.
pub fn is_optimal_bio_length(bio: &str) -> bool {
    (BIO_OPTIMAL_MIN..=BIO_OPTIMAL_MAX).contains(&char_len(bio))
}
