//! Error types for Mama Brain

use thiserror::Error;

use crate::knowledge::KnowledgeError;

/// Main error type for Mama Brain operations
#[derive(Error, Debug)]
pub enum BrainError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Knowledge lookup or import errors
    #[error("Knowledge error: {0}")]
    Knowledge(#[from] KnowledgeError),

    /// A pipeline step failed and aborted the run
    #[error("Pipeline step {step} ({name}) failed: {reason}")]
    StepFailed {
        step: u8,
        name: String,
        reason: String,
    },

    /// A step was moved through an illegal state transition
    #[error("Invalid transition for step {step}: {from} -> {to}")]
    InvalidTransition {
        step: u8,
        from: &'static str,
        to: &'static str,
    },

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// General errors
    #[error("{0}")]
    General(String),
}

impl From<serde_json::Error> for BrainError {
    fn from(e: serde_json::Error) -> Self {
        BrainError::Serialization(e.to_string())
    }
}

/// Result type alias for Mama Brain operations
pub type Result<T> = std::result::Result<T, BrainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_failed_display() {
        let err = BrainError::StepFailed {
            step: 3,
            name: "جستجوی دانش".to_string(),
            reason: "backend gone".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Pipeline step 3 (جستجوی دانش) failed: backend gone"
        );
    }

    #[test]
    fn test_knowledge_error_converts() {
        let err: BrainError = KnowledgeError::Unavailable("offline".to_string()).into();
        assert!(matches!(err, BrainError::Knowledge(_)));
        assert_eq!(err.to_string(), "Knowledge error: Knowledge source unavailable: offline");
    }
}
