//! Privacy-preserving learning signals
//!
//! Turns a normalized private message into category/score pairs. Only the
//! fixed category labels below and numeric scores ever leave this module.

use serde::{Deserialize, Serialize};

use crate::text::utf16_len;

/// Keyword buckets: intent, emotional tone, social/civic and structure hints
const CATEGORY_BUCKETS: &[(&str, &[&str])] = &[
    ("سوال", &["چی", "چه", "کی", "کجا", "چطور", "چرا", "؟"]),
    ("کمک", &["کمک", "راهنما", "نیاز", "لطف", "ممنون", "می‌تونی"]),
    ("تصمیم", &["انتخاب", "تصمیم", "باید", "یا", "کدوم"]),
    (
        "احساسی",
        &["احساس", "دل", "قلب", "عشق", "غم", "شاد", "ناراحت", "خوشحال"],
    ),
    ("نگرانی", &["نگران", "استرس", "ترس", "اضطراب", "مشکل"]),
    ("امیدوار", &["امید", "خوب", "بهتر", "می‌تونم", "موفق"]),
    (
        "اجتماعی",
        &["جامعه", "مردم", "اجتماع", "گروه", "دوست", "خانواده"],
    ),
    ("مدنی", &["آزادی", "حقوق", "عدالت", "اعتراض", "کنشگری", "مدنی"]),
    ("پیچیده", &["اما", "ولی", "چون", "پس", "بنابراین"]),
    ("مستقیم", &["فقط", "ساده", "مستقیم", "خلاصه"]),
];

pub const LENGTH_SHORT: &str = "طول_کوتاه";
pub const LENGTH_MEDIUM: &str = "طول_متوسط";
pub const LENGTH_LONG: &str = "طول_بلند";
pub const QUESTION_DENSITY: &str = "تراکم_سوال";

/// A category and its presence score in `[0, 1]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnonymizedSignal {
    pub category: String,
    pub normalized_score: f64,
}

impl AnonymizedSignal {
    fn new(category: &str, score: f64) -> Self {
        Self {
            category: category.to_string(),
            normalized_score: score.clamp(0.0, 1.0),
        }
    }
}

/// Every label [`derive_anonymized_signals`] can emit
pub fn signal_categories() -> Vec<&'static str> {
    CATEGORY_BUCKETS
        .iter()
        .map(|(category, _)| *category)
        .chain([LENGTH_SHORT, LENGTH_MEDIUM, LENGTH_LONG, QUESTION_DENSITY])
        .collect()
}

/// Derive anonymized signals from a normalized message.
///
/// Emits one entry per keyword bucket with a non-zero score, one length
/// bucket, and a question-density entry when question marks are present.
pub fn derive_anonymized_signals(normalized_message: &str) -> Vec<AnonymizedSignal> {
    let lower = normalized_message.to_lowercase();
    let mut signals = Vec::new();

    for (category, keywords) in CATEGORY_BUCKETS {
        let matched = keywords.iter().filter(|kw| lower.contains(*kw)).count();
        let score = (matched as f64 / keywords.len() as f64).min(1.0);
        if score > 0.0 {
            signals.push(AnonymizedSignal::new(category, score));
        }
    }

    let length = utf16_len(normalized_message);
    let length_category = if length < 20 {
        LENGTH_SHORT
    } else if length < 100 {
        LENGTH_MEDIUM
    } else {
        LENGTH_LONG
    };
    signals.push(AnonymizedSignal::new(
        length_category,
        (length as f64 / 200.0).min(1.0),
    ));

    let question_marks = normalized_message
        .chars()
        .filter(|c| matches!(c, '؟' | '?'))
        .count();
    if question_marks > 0 {
        signals.push(AnonymizedSignal::new(
            QUESTION_DENSITY,
            (question_marks as f64 / 3.0).min(1.0),
        ));
    }

    signals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score_of(signals: &[AnonymizedSignal], category: &str) -> Option<f64> {
        signals
            .iter()
            .find(|s| s.category == category)
            .map(|s| s.normalized_score)
    }

    #[test]
    fn test_empty_message_has_only_length_signal() {
        let signals = derive_anonymized_signals("");
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].category, LENGTH_SHORT);
        assert_eq!(signals[0].normalized_score, 0.0);
    }

    #[test]
    fn test_multiple_buckets_fire() {
        let signals = derive_anonymized_signals("چرا برای آزادی اعتراض کنیم؟ کمک کن");
        assert!(score_of(&signals, "سوال").is_some());
        assert!(score_of(&signals, "کمک").is_some());
        assert!((score_of(&signals, "مدنی").unwrap() - 2.0 / 6.0).abs() < 1e-9);
        assert!((score_of(&signals, QUESTION_DENSITY).unwrap() - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_question_density_caps_at_one() {
        let signals = derive_anonymized_signals("؟؟؟؟؟");
        assert_eq!(score_of(&signals, QUESTION_DENSITY), Some(1.0));
    }

    #[test]
    fn test_length_buckets() {
        let medium = "ا".repeat(50);
        let long = "ا".repeat(250);
        assert_eq!(score_of(&derive_anonymized_signals(&medium), LENGTH_MEDIUM), Some(0.25));
        assert_eq!(score_of(&derive_anonymized_signals(&long), LENGTH_LONG), Some(1.0));
    }

    #[test]
    fn test_only_fixed_labels_emitted() {
        let known = signal_categories();
        let message = "Mein Tagebuch: ich habe heute keine Zeit? نگرانم و دلم گرفته";
        for signal in derive_anonymized_signals(message) {
            assert!(known.contains(&signal.category.as_str()));
            assert!(!message.contains(&signal.category));
            assert!((0.0..=1.0).contains(&signal.normalized_score));
        }
    }
}
