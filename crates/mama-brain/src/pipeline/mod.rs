//! Seven-step response pipeline
//!
//! Runs a message through receive, keyboard correction, knowledge lookup,
//! tone analysis, response selection, refinement and send preparation, in
//! that order. Progress is reported through an optional [`StepObserver`].

pub mod steps;

pub use steps::{PipelineStep, StepObserver, StepStatus, initial_steps};

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::classify::{analyze_emotional_tone, detect_civic_keywords};
use crate::config::PipelineConfig;
use crate::error::{BrainError, Result};
use crate::knowledge::{FaqEntry, KnowledgeLookup};
use crate::selector::{select_civic_response, select_empathetic_response};
use crate::text::keyboard::correct_persian_keyboard;
use crate::text::normalize::{enforce_mama_prefix, normalize_persian_text};
use crate::text::utf16_len;
use steps::{
    STEP_EMOTION, STEP_KEYBOARD, STEP_KNOWLEDGE, STEP_PREPARE, STEP_RECEIVE, STEP_REFINE,
    STEP_SELECT, StepTracker,
};

/// Where the final reply came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResponseSource {
    Faq,
    Empathetic,
    CivicEmpowerment,
}

impl ResponseSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseSource::Faq => "faq",
            ResponseSource::Empathetic => "empathetic",
            ResponseSource::CivicEmpowerment => "civic-empowerment",
        }
    }
}

/// Per-message feedback, built up as the steps run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineFeedback {
    pub correction_applied: bool,
    pub faq_match_found: bool,
    pub response_source: ResponseSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empathetic_index: Option<usize>,
    pub steps_summary: Vec<String>,
}

impl Default for PipelineFeedback {
    fn default() -> Self {
        Self {
            correction_applied: false,
            faq_match_found: false,
            response_source: ResponseSource::Empathetic,
            empathetic_index: None,
            steps_summary: Vec::new(),
        }
    }
}

/// Output of one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineResult {
    pub response_content: String,
    pub feedback: PipelineFeedback,
    /// Template key to pass back as `last_template_key` next turn; `None`
    /// for knowledge-base answers
    pub selected_template_key: Option<String>,
    /// Final state of every step
    pub steps: Vec<PipelineStep>,
}

/// Reply picked in step 5, before refinement
struct Selection {
    content: String,
    source: ResponseSource,
    template_key: Option<String>,
    empathetic_index: Option<usize>,
    anti_repetition_triggered: bool,
}

/// Configured pipeline runner
#[derive(Debug, Clone, Default)]
pub struct MamaPipeline {
    config: PipelineConfig,
}

impl MamaPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run all seven steps for one message.
    ///
    /// Recoverable knowledge errors are noted in the summary and the run
    /// continues. Any other error marks the active step failed, leaves later
    /// steps pending and is returned.
    pub async fn run(
        &self,
        message: &str,
        lookup: &dyn KnowledgeLookup,
        observer: Option<&dyn StepObserver>,
        last_template_key: Option<&str>,
        aggregate_seed: Option<u64>,
    ) -> Result<PipelineResult> {
        let mut tracker = StepTracker::new(observer);

        let outcome = self
            .run_steps(&mut tracker, message, lookup, last_template_key, aggregate_seed)
            .await;

        match outcome {
            Ok((response_content, feedback, selected_template_key)) => Ok(PipelineResult {
                response_content,
                feedback,
                selected_template_key,
                steps: tracker.steps().to_vec(),
            }),
            Err(e) => {
                let failed = tracker.fail_active();
                tracing::warn!(step = ?failed, "Pipeline aborted: {e}");
                Err(e)
            }
        }
    }

    async fn run_steps(
        &self,
        tracker: &mut StepTracker<'_>,
        message: &str,
        lookup: &dyn KnowledgeLookup,
        last_template_key: Option<&str>,
        aggregate_seed: Option<u64>,
    ) -> Result<(String, PipelineFeedback, Option<String>)> {
        let mut feedback = PipelineFeedback::default();

        // 1. receive
        self.begin(tracker, STEP_RECEIVE).await?;
        tracing::debug!(length = utf16_len(message), "message received");
        feedback.steps_summary.push("پیام دریافت شد".to_string());
        tracker.complete(STEP_RECEIVE)?;

        // 2. keyboard correction
        self.begin(tracker, STEP_KEYBOARD).await?;
        let correction = correct_persian_keyboard(message);
        feedback.correction_applied = correction.was_changed;
        feedback.steps_summary.push(
            if correction.was_changed {
                "کیبورد اصلاح شد"
            } else {
                "نیاز به اصلاح نبود"
            }
            .to_string(),
        );
        let corrected = correction.corrected;
        tracker.complete(STEP_KEYBOARD)?;

        // 3. knowledge lookup
        self.begin(tracker, STEP_KNOWLEDGE).await?;
        let faq_match = self.lookup(tracker, lookup, &corrected, &mut feedback).await?;
        tracker.complete(STEP_KNOWLEDGE)?;

        // 4. tone
        self.begin(tracker, STEP_EMOTION).await?;
        let tone = analyze_emotional_tone(&corrected);
        feedback
            .steps_summary
            .push(format!("لحن احساسی: {}", tone.label()));
        tracker.complete(STEP_EMOTION)?;

        // 5. selection
        self.begin(tracker, STEP_SELECT).await?;
        let selection = self.select(&corrected, faq_match, last_template_key, aggregate_seed);
        feedback.response_source = selection.source;
        feedback.empathetic_index = selection.empathetic_index;
        feedback.steps_summary.push(
            match selection.source {
                ResponseSource::Faq => "پاسخ از دانش انتخاب شد",
                ResponseSource::Empathetic => "پاسخ همدلانه انتخاب شد",
                ResponseSource::CivicEmpowerment => "پاسخ توانمندسازی مدنی انتخاب شد",
            }
            .to_string(),
        );
        tracker.complete(STEP_SELECT)?;

        // 6. refinement
        self.begin(tracker, STEP_REFINE).await?;
        let refined = enforce_mama_prefix(&normalize_persian_text(&selection.content));
        feedback.steps_summary.push("پاسخ پالایش شد".to_string());
        tracker.complete(STEP_REFINE)?;

        // 7. send preparation
        self.begin(tracker, STEP_PREPARE).await?;
        feedback.steps_summary.push("آماده ارسال".to_string());
        tracker.complete(STEP_PREPARE)?;

        // Notes beyond the seven step lines
        if selection.anti_repetition_triggered && self.config.announce_anti_repetition {
            feedback
                .steps_summary
                .push("برای جلوگیری از تکرار، پاسخ دیگری انتخاب شد".to_string());
        }

        tracing::debug!(
            source = selection.source.as_str(),
            key = selection.template_key.as_deref().unwrap_or("-"),
            "pipeline completed"
        );

        Ok((refined, feedback, selection.template_key))
    }

    async fn begin(&self, tracker: &mut StepTracker<'_>, id: u8) -> Result<()> {
        tracker.start(id)?;
        if self.config.step_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.step_delay_ms)).await;
        }
        Ok(())
    }

    async fn lookup(
        &self,
        tracker: &StepTracker<'_>,
        lookup: &dyn KnowledgeLookup,
        question: &str,
        feedback: &mut PipelineFeedback,
    ) -> Result<Option<FaqEntry>> {
        match lookup.lookup(question).await {
            Ok(found) => {
                feedback.faq_match_found = found.is_some();
                feedback.steps_summary.push(
                    if found.is_some() {
                        "پاسخ در دانش یافت شد"
                    } else {
                        "پاسخ در دانش یافت نشد"
                    }
                    .to_string(),
                );
                Ok(found)
            }
            Err(e) if e.is_fatal() => Err(BrainError::StepFailed {
                step: STEP_KNOWLEDGE,
                name: tracker.name(STEP_KNOWLEDGE),
                reason: e.to_string(),
            }),
            Err(e) => {
                tracing::warn!(source = lookup.name(), "Knowledge lookup failed: {e}");
                feedback.steps_summary.push("خطا در جستجوی دانش".to_string());
                Ok(None)
            }
        }
    }

    fn select(
        &self,
        message: &str,
        faq_match: Option<FaqEntry>,
        last_template_key: Option<&str>,
        aggregate_seed: Option<u64>,
    ) -> Selection {
        let civic = detect_civic_keywords(message);

        let civic_selection = || {
            let picked = select_civic_response(message, last_template_key, aggregate_seed);
            Selection {
                content: picked.content,
                source: ResponseSource::CivicEmpowerment,
                template_key: Some(picked.key),
                empathetic_index: None,
                anti_repetition_triggered: picked.anti_repetition_triggered,
            }
        };

        if civic && self.config.civic_before_faq {
            return civic_selection();
        }
        if let Some(entry) = faq_match {
            return Selection {
                content: enforce_mama_prefix(&entry.answer),
                source: ResponseSource::Faq,
                template_key: None,
                empathetic_index: None,
                anti_repetition_triggered: false,
            };
        }
        if civic {
            return civic_selection();
        }

        let picked = select_empathetic_response(message, last_template_key, aggregate_seed);
        Selection {
            content: picked.content,
            source: ResponseSource::Empathetic,
            template_key: Some(picked.key),
            empathetic_index: Some(picked.index),
            anti_repetition_triggered: picked.anti_repetition_triggered,
        }
    }
}

/// Run the pipeline with default settings
pub async fn run_mama_pipeline(
    message: &str,
    lookup: &dyn KnowledgeLookup,
    observer: Option<&dyn StepObserver>,
    last_template_key: Option<&str>,
    aggregate_seed: Option<u64>,
) -> Result<PipelineResult> {
    MamaPipeline::default()
        .run(message, lookup, observer, last_template_key, aggregate_seed)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FailingKnowledge, StaticKnowledge};

    #[tokio::test]
    async fn test_empathetic_fallback() {
        let result = run_mama_pipeline(
            "امروز خیلی خسته‌ام",
            &StaticKnowledge::empty(),
            None,
            None,
            None,
        )
        .await
        .unwrap();

        assert_eq!(result.feedback.response_source, ResponseSource::Empathetic);
        assert!(result.feedback.empathetic_index.is_some());
        assert!(result.response_content.starts_with("[ماما] "));
        assert!(
            result
                .selected_template_key
                .as_deref()
                .is_some_and(|k| k.starts_with("empathetic-"))
        );
        assert_eq!(result.feedback.steps_summary.len(), 7);
        assert!(result.steps.iter().all(|s| s.status == StepStatus::Completed));
    }

    #[tokio::test]
    async fn test_faq_answer_gets_prefix() {
        let knowledge = StaticKnowledge::answering("ساعت کاری شما تا پنج عصره.");
        let result = run_mama_pipeline("ساعت کاری؟", &knowledge, None, None, None)
            .await
            .unwrap();

        assert_eq!(result.feedback.response_source, ResponseSource::Faq);
        assert!(result.feedback.faq_match_found);
        assert_eq!(result.response_content, "[ماما] ساعت کاری شما تا پنج عصره.");
        assert_eq!(result.selected_template_key, None);
        assert_eq!(result.feedback.empathetic_index, None);
    }

    #[tokio::test]
    async fn test_civic_precedence_is_configurable() {
        let knowledge = StaticKnowledge::answering("جواب دانش");

        let civic_first = MamaPipeline::default()
            .run("درباره آزادی بگو", &knowledge, None, None, None)
            .await
            .unwrap();
        assert_eq!(civic_first.feedback.response_source, ResponseSource::CivicEmpowerment);
        assert!(civic_first.feedback.faq_match_found);

        let faq_first = MamaPipeline::new(PipelineConfig {
            civic_before_faq: false,
            ..Default::default()
        })
        .run("درباره آزادی بگو", &knowledge, None, None, None)
        .await
        .unwrap();
        assert_eq!(faq_first.feedback.response_source, ResponseSource::Faq);
    }

    #[tokio::test]
    async fn test_recoverable_lookup_failure_continues() {
        let result = run_mama_pipeline("سلام", &FailingKnowledge::recoverable(), None, None, None)
            .await
            .unwrap();

        assert!(!result.feedback.faq_match_found);
        assert_eq!(result.feedback.steps_summary[2], "خطا در جستجوی دانش");
        assert_eq!(result.feedback.response_source, ResponseSource::Empathetic);
    }

    #[tokio::test]
    async fn test_fatal_lookup_failure_aborts() {
        let err = run_mama_pipeline("سلام", &FailingKnowledge::fatal(), None, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, BrainError::StepFailed { step: 3, .. }));
    }

    #[tokio::test]
    async fn test_anti_repetition_summary_line() {
        let knowledge = StaticKnowledge::empty();
        let first = run_mama_pipeline("سلام", &knowledge, None, None, None).await.unwrap();
        let second = run_mama_pipeline(
            "سلام",
            &knowledge,
            None,
            first.selected_template_key.as_deref(),
            None,
        )
        .await
        .unwrap();

        assert_ne!(first.selected_template_key, second.selected_template_key);
        assert_eq!(second.feedback.steps_summary.len(), 8);
        assert_eq!(second.feedback.steps_summary[6], "آماده ارسال");

        let quiet = MamaPipeline::new(PipelineConfig {
            announce_anti_repetition: false,
            ..Default::default()
        })
        .run("سلام", &knowledge, None, first.selected_template_key.as_deref(), None)
        .await
        .unwrap();
        assert_eq!(quiet.feedback.steps_summary.len(), 7);
        assert_eq!(quiet.response_content, second.response_content);
    }

    #[test]
    fn test_response_source_serde() {
        assert_eq!(
            serde_json::to_string(&ResponseSource::CivicEmpowerment).unwrap(),
            "\"civic-empowerment\""
        );
    }
}
