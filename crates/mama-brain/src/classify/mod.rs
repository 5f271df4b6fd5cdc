//! Keyword classifiers over normalized message text
//!
//! All classifiers are stateless containment checks against fixed word
//! lists on the lower-cased text. They never keep the message around.

pub mod signals;

pub use signals::{AnonymizedSignal, derive_anonymized_signals};

use serde::{Deserialize, Serialize};

/// Civic and social-justice keywords that route to the civic-empowerment bank
pub const CIVIC_KEYWORDS: &[&str] = &[
    "آزادی",
    "حقوق",
    "عدالت",
    "اعتراض",
    "کنشگری",
    "دموکراسی",
    "برابری",
    "مدنی",
    "تظاهرات",
    "سرکوب",
    "تبعیض",
    "انتخابات",
    "اعتصاب",
    "زندانی سیاسی",
    "freedom",
    "rights",
    "justice",
    "protest",
    "activism",
    "democracy",
    "equality",
];

const SAD_WORDS: &[&str] = &["غمگین", "ناراحت", "سخت", "دلم", "گریه", "تنها"];
const HAPPY_WORDS: &[&str] = &["خوشحال", "شاد", "عالی", "خوب", "ممنون"];
const ANXIOUS_WORDS: &[&str] = &["نگران", "استرس", "ترس", "اضطراب"];

/// Single-label emotional tone of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmotionalTone {
    Civic,
    Sad,
    Happy,
    Anxious,
    Neutral,
}

impl EmotionalTone {
    /// Persian label used in feedback summaries
    pub fn label(&self) -> &'static str {
        match self {
            EmotionalTone::Civic => "مدنی",
            EmotionalTone::Sad => "غمگین",
            EmotionalTone::Happy => "شاد",
            EmotionalTone::Anxious => "نگران",
            EmotionalTone::Neutral => "خنثی",
        }
    }
}

fn contains_any(haystack: &str, words: &[&str]) -> bool {
    words.iter().any(|w| haystack.contains(w))
}

/// Returns true if any civic keyword appears in the message
pub fn detect_civic_keywords(message: &str) -> bool {
    contains_any(&message.to_lowercase(), CIVIC_KEYWORDS)
}

/// Classify the emotional tone.
///
/// Buckets are checked in the order civic, sad, happy, anxious; the first
/// hit wins and anything else is neutral.
pub fn analyze_emotional_tone(message: &str) -> EmotionalTone {
    let lower = message.to_lowercase();

    if contains_any(&lower, CIVIC_KEYWORDS) {
        EmotionalTone::Civic
    } else if contains_any(&lower, SAD_WORDS) {
        EmotionalTone::Sad
    } else if contains_any(&lower, HAPPY_WORDS) {
        EmotionalTone::Happy
    } else if contains_any(&lower, ANXIOUS_WORDS) {
        EmotionalTone::Anxious
    } else {
        EmotionalTone::Neutral
    }
}
