//! Knowledge-base (FAQ) seam
//!
//! The pipeline consults an external knowledge source through
//! [`KnowledgeLookup`]. Storage belongs to the caller; this module only
//! defines the traits, a reference in-memory store and a batched importer.

pub mod import;
pub mod memory;

pub use import::{ImportReport, import_faq_entries};
pub use memory::InMemoryKnowledge;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A question/answer pair from the knowledge base
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

impl FaqEntry {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Knowledge-source errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum KnowledgeError {
    #[error("Knowledge source unavailable: {0}")]
    Unavailable(String),
    #[error("Knowledge lookup timed out: {0}")]
    Timeout(String),
    #[error("Invalid knowledge entry: {0}")]
    InvalidEntry(String),
    /// Errors the pipeline must not swallow
    #[error("Fatal knowledge error: {0}")]
    Fatal(String),
}

impl KnowledgeError {
    /// True for errors that abort the pipeline instead of falling back
    pub fn is_fatal(&self) -> bool {
        matches!(self, KnowledgeError::Fatal(_))
    }
}

/// Read-only FAQ lookup used by the pipeline's knowledge step
#[async_trait]
pub trait KnowledgeLookup: Send + Sync {
    /// Find an entry answering `question`, if any
    async fn lookup(&self, question: &str) -> Result<Option<FaqEntry>, KnowledgeError>;

    /// Source name for logging
    fn name(&self) -> &'static str;
}

/// Write side of a knowledge store, used by batch import
#[async_trait]
pub trait KnowledgeSink: Send + Sync {
    async fn add_entry(&self, entry: FaqEntry) -> Result<(), KnowledgeError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_fatal_is_fatal() {
        assert!(KnowledgeError::Fatal("x".into()).is_fatal());
        assert!(!KnowledgeError::Unavailable("x".into()).is_fatal());
        assert!(!KnowledgeError::Timeout("x".into()).is_fatal());
        assert!(!KnowledgeError::InvalidEntry("x".into()).is_fatal());
    }

    #[test]
    fn test_faq_entry_serde() {
        let entry: FaqEntry =
            serde_json::from_str(r#"{"question":"ساعت کاری؟","answer":"نه تا پنج"}"#).unwrap();
        assert_eq!(entry, FaqEntry::new("ساعت کاری؟", "نه تا پنج"));
    }
}
