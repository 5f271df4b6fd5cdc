//! Integration tests for the seven-step response pipeline
//!
//! Tests verify that:
//! - Steps advance in order and every transition reaches the observer
//! - Same input always yields the same reply and template key
//! - Recoverable lookup failures fall back, fatal ones abort at step 3
//! - Civic messages route to the civic bank

use mama_brain::config::PipelineConfig;
use mama_brain::testing::{FailingKnowledge, RecordingObserver, StaticKnowledge};
use mama_brain::{
    BrainError, InMemoryKnowledge, MamaPipeline, ResponseSource, StepStatus, run_mama_pipeline,
};
use mama_brain::{FaqEntry, catalog::NEW_ANGLE_NOTICE};

// =============================================================================
// Step Progress
// =============================================================================

#[tokio::test]
async fn test_observer_sees_every_transition() {
    let observer = RecordingObserver::new();
    run_mama_pipeline("سلام", &StaticKnowledge::empty(), Some(&observer), None, None)
        .await
        .unwrap();

    let snapshots = observer.snapshots();
    assert_eq!(snapshots.len(), 14);

    // Step n turns active at snapshot 2(n-1), completed at 2(n-1)+1
    for (i, snapshot) in snapshots.iter().enumerate() {
        let step = i / 2;
        let expected = if i % 2 == 0 {
            StepStatus::Active
        } else {
            StepStatus::Completed
        };
        assert_eq!(snapshot[step].status, expected);
        assert!(snapshot[..step].iter().all(|s| s.status == StepStatus::Completed));
        assert!(snapshot[step + 1..].iter().all(|s| s.status == StepStatus::Pending));
    }
}

#[tokio::test]
async fn test_fatal_failure_marks_step_three_failed() {
    let observer = RecordingObserver::new();
    let knowledge = FailingKnowledge::fatal();

    let err = run_mama_pipeline("سلام", &knowledge, Some(&observer), None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, BrainError::StepFailed { step: 3, .. }));
    assert_eq!(knowledge.calls(), 1);

    let last = observer.last().unwrap();
    let statuses: Vec<StepStatus> = last.iter().map(|s| s.status).collect();
    assert_eq!(
        statuses,
        vec![
            StepStatus::Completed,
            StepStatus::Completed,
            StepStatus::Failed,
            StepStatus::Pending,
            StepStatus::Pending,
            StepStatus::Pending,
            StepStatus::Pending,
        ]
    );
}

#[tokio::test]
async fn test_recoverable_failure_completes_all_steps() {
    let observer = RecordingObserver::new();
    let result = run_mama_pipeline(
        "سلام",
        &FailingKnowledge::recoverable(),
        Some(&observer),
        None,
        None,
    )
    .await
    .unwrap();

    assert!(result.feedback.steps_summary.contains(&"خطا در جستجوی دانش".to_string()));
    assert!(
        observer
            .last()
            .unwrap()
            .iter()
            .all(|s| s.status == StepStatus::Completed)
    );
}

// =============================================================================
// Determinism and Anti-Repetition
// =============================================================================

#[tokio::test]
async fn test_pipeline_is_deterministic() {
    let knowledge = StaticKnowledge::empty();
    for seed in [None, Some(0), Some(42), Some(9_999)] {
        for last in [None, Some("empathetic-3")] {
            let a = run_mama_pipeline("دلم گرفته، چیکار کنم؟", &knowledge, None, last, seed)
                .await
                .unwrap();
            let b = run_mama_pipeline("دلم گرفته، چیکار کنم؟", &knowledge, None, last, seed)
                .await
                .unwrap();
            assert_eq!(a.response_content, b.response_content);
            assert_eq!(a.selected_template_key, b.selected_template_key);
        }
    }
}

#[tokio::test]
async fn test_repeated_key_gets_new_angle() {
    let knowledge = StaticKnowledge::empty();
    let first = run_mama_pipeline("خیلی ناراحتم", &knowledge, None, None, Some(17))
        .await
        .unwrap();
    let second = run_mama_pipeline(
        "خیلی ناراحتم",
        &knowledge,
        None,
        first.selected_template_key.as_deref(),
        Some(17),
    )
    .await
    .unwrap();

    assert_ne!(first.selected_template_key, second.selected_template_key);
    assert!(!first.response_content.contains(NEW_ANGLE_NOTICE));
    assert!(second.response_content.contains(NEW_ANGLE_NOTICE));
}

// =============================================================================
// Routing
// =============================================================================

#[tokio::test]
async fn test_civic_message_never_empathetic() {
    for knowledge in [StaticKnowledge::empty(), StaticKnowledge::answering("جواب")] {
        let result = run_mama_pipeline("من به آزادی فکر می‌کنم", &knowledge, None, None, None)
            .await
            .unwrap();
        assert_eq!(result.feedback.response_source, ResponseSource::CivicEmpowerment);
        assert!(
            result
                .selected_template_key
                .as_deref()
                .is_some_and(|k| k.starts_with("civic-"))
        );
    }
}

#[tokio::test]
async fn test_latin_typed_persian_is_corrected_before_lookup() {
    let knowledge =
        InMemoryKnowledge::with_entries([FaqEntry::new("سلام", "سلام عزیزم، خوش اومدی.")]);
    let result = run_mama_pipeline("sghl", &knowledge, None, None, None)
        .await
        .unwrap();

    assert!(result.feedback.correction_applied);
    assert_eq!(result.feedback.steps_summary[1], "کیبورد اصلاح شد");
    assert_eq!(result.feedback.response_source, ResponseSource::Faq);
    assert_eq!(result.response_content, "[ماما] سلام عزیزم، خوش اومدی.");
}

#[tokio::test]
async fn test_output_is_refined() {
    let knowledge = StaticKnowledge::answering("  [Mama]   جواب   با   فاصله ها  ");
    let result = run_mama_pipeline("سوال", &knowledge, None, None, None)
        .await
        .unwrap();
    assert_eq!(result.response_content, "[ماما] جواب با فاصله ها");
}

#[tokio::test]
async fn test_step_delay_still_completes() {
    let pipeline = MamaPipeline::new(PipelineConfig {
        step_delay_ms: 1,
        ..Default::default()
    });
    let result = pipeline
        .run("سلام", &StaticKnowledge::empty(), None, None, None)
        .await
        .unwrap();
    assert_eq!(result.steps.len(), 7);
    assert!(result.steps.iter().all(|s| s.status == StepStatus::Completed));
}
