use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{BrainError, Result};

/// Main configuration structure for Mama Brain
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct BrainConfig {
    /// Pipeline behavior
    #[serde(default)]
    pub pipeline: PipelineConfig,
    /// Knowledge-base batch import settings
    #[serde(default)]
    pub import: ImportConfig,
    /// Per-conversation session tracking
    #[serde(default)]
    pub sessions: SessionConfig,
}

impl BrainConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BrainError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        toml::from_str(&content)
            .map_err(|e| BrainError::Config(format!("Failed to parse config: {e}")))
    }

    /// Load from the first existing default location, or fall back to defaults
    pub fn discover() -> Result<Self> {
        for path in Self::default_paths() {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::load(&path);
            }
        }

        tracing::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Candidate config file locations, in lookup order
    pub fn default_paths() -> Vec<PathBuf> {
        [
            dirs::home_dir().map(|h| h.join(".mama-brain").join("config.toml")),
            dirs::config_dir().map(|c| c.join("mama-brain").join("config.toml")),
            Some(PathBuf::from("mama-brain.toml")),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// Pipeline behavior configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineConfig {
    /// Pause between steps in milliseconds (0 disables pacing)
    #[serde(default)]
    pub step_delay_ms: u64,
    /// Civic detection takes precedence over an FAQ hit
    #[serde(default = "default_civic_before_faq")]
    pub civic_before_faq: bool,
    /// Add a summary line when anti-repetition changes the template
    #[serde(default = "default_announce_anti_repetition")]
    pub announce_anti_repetition: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            step_delay_ms: 0,
            civic_before_faq: default_civic_before_faq(),
            announce_anti_repetition: default_announce_anti_repetition(),
        }
    }
}

fn default_civic_before_faq() -> bool {
    true
}

fn default_announce_anti_repetition() -> bool {
    true
}

/// Bounded-concurrency FAQ import configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImportConfig {
    /// Entries imported concurrently per batch
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Pause between batches in milliseconds
    #[serde(default = "default_batch_delay_ms")]
    pub batch_delay_ms: u64,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            batch_delay_ms: default_batch_delay_ms(),
        }
    }
}

fn default_batch_size() -> usize {
    5
}

fn default_batch_delay_ms() -> u64 {
    50
}

/// Conversation session configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Maximum number of conversations tracked before LRU eviction
    #[serde(default = "default_max_conversations")]
    pub max_conversations: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_conversations: default_max_conversations(),
        }
    }
}

fn default_max_conversations() -> usize {
    crate::session::DEFAULT_MAX_CONVERSATIONS
}
