use crate::strength::{is_optimal_bio_length, MAX_SCORE};

/// Width of the text strength meter, in cells.
const BAR_WIDTH: usize = 20;

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Character count shown under the bio field.
pub fn bio_length_hint(bio: &str) -> String {
    let count = bio.chars().count();
    if is_optimal_bio_length(bio) {
        format!("{} characters ✓ Optimal length!", count)
    } else {
        format!("{} characters", count)
    }
}

/// Fixed-width meter for a 0-100 score, e.g. `[##########----------]`.
pub fn strength_bar(score: u8) -> String {
    let score = usize::from(score.min(MAX_SCORE));
    let filled = score * BAR_WIDTH / usize::from(MAX_SCORE);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}
