//! Persian keyboard-layout correction
//!
//! Detects Persian typed while the English (QWERTY) layout was active and
//! maps each key back to the Persian character on the same key.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::contains_persian;

/// Minimum number of Latin letters before correction is considered
const MIN_LATIN_LETTERS: usize = 3;

/// Latin letters must make up more than this share of non-whitespace chars
const MIN_LATIN_RATIO: f64 = 0.5;

static COMMON_ENGLISH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(the|is|are|was|were|have|has|had|do|does|did|will|would|can|could|should|may|might|must|hello|hi|yes|no|ok|okay|thanks|thank|you|me|my|your|this|that|what|when|where|who|why|how)\b",
    )
    .expect("valid english stoplist pattern")
});

/// Outcome of a keyboard-layout correction attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectionResult {
    pub corrected: String,
    pub was_changed: bool,
}

impl CorrectionResult {
    fn unchanged(text: &str) -> Self {
        Self {
            corrected: text.to_string(),
            was_changed: false,
        }
    }
}

/// Map a key typed on the English layout to the Persian character on that key
fn persian_key(c: char) -> Option<char> {
    let mapped = match c {
        'q' | 'Q' => 'ض',
        'w' | 'W' => 'ص',
        'e' | 'E' => 'ث',
        'r' | 'R' => 'ق',
        't' | 'T' => 'ف',
        'y' | 'Y' => 'غ',
        'u' | 'U' => 'ع',
        'i' | 'I' => 'ه',
        'o' | 'O' => 'خ',
        'p' | 'P' => 'ح',
        'a' | 'A' => 'ش',
        's' | 'S' => 'س',
        'd' | 'D' => 'ی',
        'f' | 'F' => 'ب',
        'g' | 'G' => 'ل',
        'h' | 'H' => 'ا',
        'j' | 'J' => 'ت',
        'k' | 'K' => 'ن',
        'l' | 'L' => 'م',
        ';' => 'ک',
        'z' | 'Z' => 'ظ',
        'x' | 'X' => 'ط',
        'c' | 'C' => 'ز',
        'v' | 'V' => 'ر',
        'b' | 'B' => 'ذ',
        'n' | 'N' => 'د',
        'm' | 'M' => 'پ',
        ',' => 'و',
        '[' | '{' => 'ج',
        ']' | '}' => 'چ',
        '\'' => 'گ',
        '<' => '>',
        '>' => '<',
        '?' => '؟',
        _ => return None,
    };
    Some(mapped)
}

/// Decide whether the text looks like Persian typed on the English layout
fn should_correct(text: &str) -> bool {
    if text.trim().is_empty() || contains_persian(text) {
        return false;
    }

    let latin_letters = text.chars().filter(char::is_ascii_alphabetic).count();
    if latin_letters < MIN_LATIN_LETTERS {
        return false;
    }

    if COMMON_ENGLISH.is_match(text) {
        return false;
    }

    let non_whitespace = text.chars().filter(|c| !c.is_whitespace()).count();
    (latin_letters as f64 / non_whitespace as f64) > MIN_LATIN_RATIO
}

fn convert_to_persian(text: &str) -> String {
    text.chars().map(|c| persian_key(c).unwrap_or(c)).collect()
}

/// Correct Persian typed with the English keyboard layout.
///
/// Returns the input untouched (`was_changed == false`) when the heuristic
/// declines or when the mapping would not yield any Persian character.
pub fn correct_persian_keyboard(text: &str) -> CorrectionResult {
    if !should_correct(text) {
        return CorrectionResult::unchanged(text);
    }

    let corrected = convert_to_persian(text);
    if !contains_persian(&corrected) {
        return CorrectionResult::unchanged(text);
    }

    CorrectionResult {
        corrected,
        was_changed: true,
    }
}
