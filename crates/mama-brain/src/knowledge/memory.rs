//! In-memory knowledge store

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{FaqEntry, KnowledgeError, KnowledgeLookup, KnowledgeSink};
use crate::text::normalize::normalize_persian_text;

/// FAQ store keyed by normalized, lower-cased question
#[derive(Debug, Default)]
pub struct InMemoryKnowledge {
    entries: RwLock<HashMap<String, FaqEntry>>,
}

impl InMemoryKnowledge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from existing entries; later duplicates replace earlier ones
    pub fn with_entries(entries: impl IntoIterator<Item = FaqEntry>) -> Self {
        let map = entries
            .into_iter()
            .map(|entry| (Self::question_key(&entry.question), entry))
            .collect();
        Self {
            entries: RwLock::new(map),
        }
    }

    fn question_key(question: &str) -> String {
        normalize_persian_text(question).to_lowercase()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Entries whose question or answer contains `keyword`, sorted by question
    pub async fn search_by_keyword(&self, keyword: &str) -> Vec<FaqEntry> {
        let needle = keyword.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let entries = self.entries.read().await;
        let mut matches: Vec<FaqEntry> = entries
            .values()
            .filter(|e| {
                e.question.to_lowercase().contains(&needle)
                    || e.answer.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.question.cmp(&b.question));
        matches
    }
}

#[async_trait]
impl KnowledgeLookup for InMemoryKnowledge {
    async fn lookup(&self, question: &str) -> Result<Option<FaqEntry>, KnowledgeError> {
        let key = Self::question_key(question);
        Ok(self.entries.read().await.get(&key).cloned())
    }

    fn name(&self) -> &'static str {
        "in-memory"
    }
}

#[async_trait]
impl KnowledgeSink for InMemoryKnowledge {
    async fn add_entry(&self, entry: FaqEntry) -> Result<(), KnowledgeError> {
        if entry.question.trim().is_empty() || entry.answer.trim().is_empty() {
            return Err(KnowledgeError::InvalidEntry(
                "question and answer must not be empty".to_string(),
            ));
        }
        let key = Self::question_key(&entry.question);
        self.entries.write().await.insert(key, entry);
        Ok(())
    }
}
