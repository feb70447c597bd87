//! Utility functions for text formatting.

pub mod format;

pub use format::{bio_length_hint, strength_bar, truncate_string};
