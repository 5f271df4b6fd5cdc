//! Angle-candidate derivation and primary-angle selection
//!
//! Drives the depth-template feature: message features become a ranked,
//! type-unique list of angles, and one of them is picked deterministically.

use serde::{Deserialize, Serialize};

use crate::bias::{BiasSignal, apply_bias_to_angles};
use crate::catalog::{AngleType, NEW_ANGLE_NOTICE, depth_template, generate_deep_response};
use crate::text::normalize::normalize_persian_text;
use crate::text::utf16_len;

const QUESTION_WORDS: &[&str] = &["چی", "چه", "کی", "کجا", "چطور", "چرا"];
const HELP_WORDS: &[&str] = &["کمک", "راهنما", "نیاز", "چطور"];
const DECISION_WORDS: &[&str] = &["انتخاب", "تصمیم", "باید", "یا"];
const EMOTION_WORDS: &[&str] = &["احساس", "دل", "قلب", "غم", "شاد", "ناراحت"];

/// Messages longer than this (UTF-16 units) are treated as complex
const COMPLEX_LENGTH: usize = 100;

/// A ranked angle option for one message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AngleCandidate {
    #[serde(rename = "type")]
    pub angle: AngleType,
    pub key: String,
    pub priority: f64,
}

impl AngleCandidate {
    pub fn new(angle: AngleType, priority: f64) -> Self {
        Self {
            angle,
            key: angle.key().to_string(),
            priority,
        }
    }
}

/// Coarse features read off a message
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MessageFeatures {
    pub has_question: bool,
    pub needs_help: bool,
    pub has_decision: bool,
    pub has_emotion: bool,
    pub is_complex: bool,
}

impl MessageFeatures {
    pub fn detect(normalized_message: &str) -> Self {
        let lower = normalized_message.to_lowercase();
        let any = |words: &[&str]| words.iter().any(|w| lower.contains(w));

        Self {
            has_question: normalized_message.contains(['؟', '?']) || any(QUESTION_WORDS),
            needs_help: any(HELP_WORDS),
            has_decision: any(DECISION_WORDS),
            has_emotion: any(EMOTION_WORDS),
            is_complex: utf16_len(normalized_message) > COMPLEX_LENGTH,
        }
    }
}

/// Derive ranked angle candidates for a message.
///
/// Priorities are `base + offset` where `base = len mod 10`, shifted by the
/// aggregate seed when present. The list always holds an empathetic entry,
/// is sorted by descending priority and holds each angle type once.
pub fn derive_angle_candidates(
    normalized_message: &str,
    aggregate_seed: Option<u64>,
) -> Vec<AngleCandidate> {
    let features = MessageFeatures::detect(normalized_message);

    let mut base = (utf16_len(normalized_message) % 10) as u64;
    if let Some(seed) = aggregate_seed {
        base = (base + seed % 10) % 10;
    }
    let base = base as f64;

    let mut candidates = Vec::new();
    let mut push = |angle: AngleType, offset: f64| {
        candidates.push(AngleCandidate::new(angle, base + offset));
    };

    if features.has_question {
        push(AngleType::Clarification, 8.0);
        push(AngleType::StepByStep, 7.0);
    }
    if features.needs_help {
        push(AngleType::StepByStep, 9.0);
        push(AngleType::NextSteps, 6.0);
    }
    if features.has_decision {
        push(AngleType::ProsCons, 8.0);
        push(AngleType::Reframe, 5.0);
    }
    if features.has_emotion {
        push(AngleType::Empathetic, 10.0);
        push(AngleType::Diagnostic, 4.0);
    }
    if features.is_complex {
        push(AngleType::Summary, 6.0);
        push(AngleType::Reframe, 5.0);
    }

    if !candidates.iter().any(|c| c.angle == AngleType::Empathetic) {
        candidates.push(AngleCandidate::new(AngleType::Empathetic, base + 3.0));
    }
    candidates.push(AngleCandidate::new(AngleType::Example, base + 2.0));

    rank_unique(candidates)
}

/// Stable sort by descending priority, keeping the first entry per angle type
fn rank_unique(mut candidates: Vec<AngleCandidate>) -> Vec<AngleCandidate> {
    candidates.sort_by(|a, b| b.priority.total_cmp(&a.priority));

    let mut unique: Vec<AngleCandidate> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if !unique.iter().any(|c| c.angle == candidate.angle) {
            unique.push(candidate);
        }
    }
    unique
}

/// The chosen angle and whether anti-repetition moved the choice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AngleSelection {
    pub angle: AngleCandidate,
    pub anti_repetition_triggered: bool,
}

/// Pick the primary angle.
///
/// Takes the top candidate unless its key equals `last_template_key` (then
/// the second). With more than two candidates the aggregate seed adds an
/// offset of `seed mod count`.
pub fn select_primary_angle(
    candidates: &[AngleCandidate],
    last_template_key: Option<&str>,
    aggregate_seed: Option<u64>,
) -> AngleSelection {
    if candidates.is_empty() {
        return AngleSelection {
            angle: AngleCandidate::new(AngleType::Empathetic, 0.0),
            anti_repetition_triggered: false,
        };
    }

    let mut index = 0;
    let mut anti_repetition_triggered = false;

    if candidates.len() > 1 && last_template_key == Some(candidates[0].key.as_str()) {
        index = 1;
        anti_repetition_triggered = true;
    }

    if let Some(seed) = aggregate_seed {
        if candidates.len() > 2 {
            let count = candidates.len() as u64;
            index = ((index as u64 + seed % count) % count) as usize;
        }
    }

    AngleSelection {
        angle: candidates[index].clone(),
        anti_repetition_triggered,
    }
}

/// A composed depth reply
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepthResponse {
    pub angle: AngleType,
    /// Angle key to carry forward as the next `last_template_key`
    pub template_key: String,
    pub depth_template_key: &'static str,
    pub content: String,
    pub anti_repetition_triggered: bool,
    /// Candidates after biasing, in selection order
    pub candidates: Vec<AngleCandidate>,
}

/// Derive, bias, select and render a depth reply for a message
pub fn compose_depth_response(
    message: &str,
    last_template_key: Option<&str>,
    aggregate_seed: Option<u64>,
    bias: &[BiasSignal],
) -> DepthResponse {
    let normalized = normalize_persian_text(message);
    let candidates = derive_angle_candidates(&normalized, aggregate_seed);
    let candidates = rank_unique(apply_bias_to_angles(&candidates, bias));

    let selection = select_primary_angle(&candidates, last_template_key, aggregate_seed);
    let angle = selection.angle.angle;

    let mut content = generate_deep_response(angle, &normalized, aggregate_seed);
    if selection.anti_repetition_triggered {
        content.push_str("\n\n");
        content.push_str(NEW_ANGLE_NOTICE);
    }

    tracing::debug!(
        angle = angle.as_str(),
        candidates = candidates.len(),
        anti_repetition = selection.anti_repetition_triggered,
        "composed depth response"
    );

    DepthResponse {
        angle,
        template_key: selection.angle.key,
        depth_template_key: depth_template(angle).key,
        content,
        anti_repetition_triggered: selection.anti_repetition_triggered,
        candidates,
    }
}
