//! Persian text utilities
//!
//! Typography normalization, the mandatory response prefix, and
//! keyboard-layout correction for Persian typed on a Latin layout.

pub mod keyboard;
pub mod normalize;

pub use keyboard::{CorrectionResult, correct_persian_keyboard};
pub use normalize::{MAMA_PREFIX, enforce_mama_prefix, normalize_persian_text};

/// Maximum number of characters kept by [`sanitize_user_prompt`]
pub const SANITIZED_PROMPT_CHARS: usize = 50;

/// Returns true for characters in the Arabic/Persian block (U+0600..=U+06FF)
pub fn is_persian_char(c: char) -> bool {
    ('\u{0600}'..='\u{06FF}').contains(&c)
}

/// Returns true if the text contains any Persian-range character
pub fn contains_persian(text: &str) -> bool {
    text.chars().any(is_persian_char)
}

/// Length of the text in UTF-16 code units.
///
/// Selection hashes and length buckets are defined over UTF-16 units so
/// that template keys stay stable for already-stored conversations.
pub fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// UTF-16 code unit of the first character, or 0 for empty text
pub fn first_code_unit(text: &str) -> u32 {
    text.encode_utf16().next().map(u32::from).unwrap_or(0)
}

/// UTF-16 code unit at the end of the text, or 0 for empty text
pub fn last_code_unit(text: &str) -> u32 {
    text.encode_utf16().last().map(u32::from).unwrap_or(0)
}

/// Bounded, lossy excerpt of a user prompt for metadata storage.
///
/// Keeps the first 50 characters and appends `...` when the prompt is longer.
pub fn sanitize_user_prompt(prompt: &str) -> String {
    if prompt.chars().count() > SANITIZED_PROMPT_CHARS {
        let head: String = prompt.chars().take(SANITIZED_PROMPT_CHARS).collect();
        format!("{head}...")
    } else {
        prompt.to_string()
    }
}
