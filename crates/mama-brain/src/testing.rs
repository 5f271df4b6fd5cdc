//! Test utilities for mama-brain - knowledge mocks and step recorders
//!
//! These stand in for the external knowledge backend and the progress UI in
//! unit and integration tests.

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::knowledge::{FaqEntry, KnowledgeError, KnowledgeLookup};
use crate::pipeline::{PipelineStep, StepObserver};

/// Lookup that returns the same result for every question
#[derive(Debug, Clone, Default)]
pub struct StaticKnowledge {
    answer: Option<String>,
}

impl StaticKnowledge {
    /// Never finds anything
    pub fn empty() -> Self {
        Self { answer: None }
    }

    /// Answers every question with `answer`
    pub fn answering(answer: impl Into<String>) -> Self {
        Self {
            answer: Some(answer.into()),
        }
    }
}

#[async_trait]
impl KnowledgeLookup for StaticKnowledge {
    async fn lookup(&self, question: &str) -> Result<Option<FaqEntry>, KnowledgeError> {
        Ok(self
            .answer
            .as_ref()
            .map(|answer| FaqEntry::new(question, answer.clone())))
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

/// Lookup that always errors and counts how often it was called
#[derive(Debug)]
pub struct FailingKnowledge {
    error: KnowledgeError,
    calls: AtomicUsize,
}

impl FailingKnowledge {
    pub fn new(error: KnowledgeError) -> Self {
        Self {
            error,
            calls: AtomicUsize::new(0),
        }
    }

    /// Fails with a recoverable `Unavailable` error
    pub fn recoverable() -> Self {
        Self::new(KnowledgeError::Unavailable("backend offline".to_string()))
    }

    /// Fails with an error the pipeline must not swallow
    pub fn fatal() -> Self {
        Self::new(KnowledgeError::Fatal("corrupted index".to_string()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KnowledgeLookup for FailingKnowledge {
    async fn lookup(&self, _question: &str) -> Result<Option<FaqEntry>, KnowledgeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(self.error.clone())
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

/// Observer that keeps every snapshot it receives
#[derive(Debug, Default)]
pub struct RecordingObserver {
    snapshots: Mutex<Vec<Vec<PipelineStep>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshots(&self) -> Vec<Vec<PipelineStep>> {
        self.snapshots
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    pub fn last(&self) -> Option<Vec<PipelineStep>> {
        self.snapshots().pop()
    }
}

impl StepObserver for RecordingObserver {
    fn on_step_update(&self, steps: Vec<PipelineStep>) {
        if let Ok(mut snapshots) = self.snapshots.lock() {
            snapshots.push(steps);
        }
    }
}
