//! Mama Brain - deterministic response engine for Persian-language chat
//!
//! This crate turns a user message into a Mama-prefixed reply through a
//! fixed seven-step pipeline: keyboard-layout correction, knowledge lookup,
//! keyword classification, template selection with anti-repetition and
//! aggregate-seed biasing, and typographic normalization.

pub mod bias;
pub mod catalog;
pub mod classify;
pub mod config;
pub mod error;
pub mod knowledge;
pub mod pipeline;
pub mod selector;
pub mod session;
pub mod testing;
pub mod text;

pub use error::{BrainError, Result};
pub use knowledge::{FaqEntry, InMemoryKnowledge, KnowledgeError, KnowledgeLookup};
pub use pipeline::{
    MamaPipeline, PipelineFeedback, PipelineResult, PipelineStep, ResponseSource, StepObserver,
    StepStatus, run_mama_pipeline,
};
