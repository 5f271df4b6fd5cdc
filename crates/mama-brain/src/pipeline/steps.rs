//! Pipeline step state machine
//!
//! Each step moves `pending -> active -> completed`, or `active -> failed`.
//! Every transition pushes a fresh snapshot of the whole step list to the
//! observer, so observers never alias tracker state.

use serde::{Deserialize, Serialize};

use crate::error::{BrainError, Result};

/// Lifecycle state of one step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Pending,
    Active,
    Completed,
    Failed,
}

impl StepStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Pending => "pending",
            StepStatus::Active => "active",
            StepStatus::Completed => "completed",
            StepStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, StepStatus::Completed | StepStatus::Failed)
    }

    fn can_transition_to(&self, next: StepStatus) -> bool {
        matches!(
            (self, next),
            (StepStatus::Pending, StepStatus::Active)
                | (StepStatus::Active, StepStatus::Completed)
                | (StepStatus::Active, StepStatus::Failed)
        )
    }
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One stage of the seven-step pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineStep {
    pub id: u8,
    pub name: String,
    pub status: StepStatus,
    pub description: String,
}

pub const STEP_RECEIVE: u8 = 1;
pub const STEP_KEYBOARD: u8 = 2;
pub const STEP_KNOWLEDGE: u8 = 3;
pub const STEP_EMOTION: u8 = 4;
pub const STEP_SELECT: u8 = 5;
pub const STEP_REFINE: u8 = 6;
pub const STEP_PREPARE: u8 = 7;

const STEP_DEFINITIONS: [(u8, &str, &str); 7] = [
    (STEP_RECEIVE, "دریافت پیام", "پیام کاربر دریافت شد"),
    (STEP_KEYBOARD, "اصلاح کیبورد", "بررسی و اصلاح کیبورد فارسی"),
    (STEP_KNOWLEDGE, "جستجوی دانش", "جستجو در بانک دانش ماما"),
    (STEP_EMOTION, "تحلیل احساسی", "تحلیل احساسات پیام"),
    (STEP_SELECT, "انتخاب پاسخ", "انتخاب بهترین پاسخ"),
    (STEP_REFINE, "پالایش نهایی", "پالایش و بهینه‌سازی پاسخ"),
    (STEP_PREPARE, "آماده‌سازی", "آماده‌سازی برای ارسال"),
];

/// The seven steps in order, all pending
pub fn initial_steps() -> Vec<PipelineStep> {
    STEP_DEFINITIONS
        .iter()
        .map(|(id, name, description)| PipelineStep {
            id: *id,
            name: name.to_string(),
            status: StepStatus::Pending,
            description: description.to_string(),
        })
        .collect()
}

/// Receives step-list snapshots after every transition
pub trait StepObserver: Send + Sync {
    fn on_step_update(&self, steps: Vec<PipelineStep>);
}

impl<F> StepObserver for F
where
    F: Fn(Vec<PipelineStep>) + Send + Sync,
{
    fn on_step_update(&self, steps: Vec<PipelineStep>) {
        self(steps)
    }
}

/// Owns the step list for one pipeline run
pub(crate) struct StepTracker<'a> {
    steps: Vec<PipelineStep>,
    observer: Option<&'a dyn StepObserver>,
}

impl<'a> StepTracker<'a> {
    pub(crate) fn new(observer: Option<&'a dyn StepObserver>) -> Self {
        Self {
            steps: initial_steps(),
            observer,
        }
    }

    pub(crate) fn steps(&self) -> &[PipelineStep] {
        &self.steps
    }

    pub(crate) fn name(&self, id: u8) -> String {
        self.steps
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.name.clone())
            .unwrap_or_default()
    }

    pub(crate) fn start(&mut self, id: u8) -> Result<()> {
        self.transition(id, StepStatus::Active)
    }

    pub(crate) fn complete(&mut self, id: u8) -> Result<()> {
        self.transition(id, StepStatus::Completed)
    }

    /// Mark whichever step is active as failed; returns its id
    pub(crate) fn fail_active(&mut self) -> Option<u8> {
        let id = self
            .steps
            .iter()
            .find(|s| s.status == StepStatus::Active)
            .map(|s| s.id)?;
        self.transition(id, StepStatus::Failed).ok()?;
        Some(id)
    }

    fn transition(&mut self, id: u8, next: StepStatus) -> Result<()> {
        let step = self
            .steps
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| BrainError::General(format!("Unknown pipeline step {id}")))?;

        if !step.status.can_transition_to(next) {
            return Err(BrainError::InvalidTransition {
                step: id,
                from: step.status.as_str(),
                to: next.as_str(),
            });
        }

        step.status = next;
        tracing::debug!(step = id, status = next.as_str(), "pipeline step transition");

        if let Some(observer) = self.observer {
            observer.on_step_update(self.steps.clone());
        }
        Ok(())
    }
}
