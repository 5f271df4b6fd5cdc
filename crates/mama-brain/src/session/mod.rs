//! Per-conversation anti-repetition state
//!
//! The pipeline itself is stateless; the previous template key belongs to
//! the conversation. [`ConversationRegistry`] keeps that key for a bounded
//! number of conversations and makes sure only one pipeline run per
//! conversation is in flight at a time.

use lru::LruCache;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex as StdMutex, Weak};
use tokio::sync::Mutex;

use crate::config::SessionConfig;
use crate::error::{BrainError, Result};
use crate::knowledge::KnowledgeLookup;
use crate::pipeline::{MamaPipeline, PipelineResult, StepObserver};

/// Default number of conversations tracked
pub const DEFAULT_MAX_CONVERSATIONS: usize = 1000;

/// What the registry remembers about a conversation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationState {
    pub last_template_key: Option<String>,
    pub turns: u64,
}

type Slot = Arc<Mutex<ConversationState>>;

/// Tracked conversations.
///
/// A slot pushed out of `recent` while a turn still holds it moves to
/// `parked`, where the next turn for that id finds it again. Parked entries
/// disappear once the last turn drops its handle.
#[derive(Debug)]
struct Slots {
    recent: LruCache<String, Slot>,
    parked: HashMap<String, Weak<Mutex<ConversationState>>>,
}

impl Slots {
    fn get_or_insert(&mut self, conversation_id: &str) -> Slot {
        if let Some(slot) = self.recent.get(conversation_id) {
            return Arc::clone(slot);
        }

        self.parked.retain(|_, weak| weak.strong_count() > 0);
        let slot = self
            .parked
            .remove(conversation_id)
            .and_then(|weak| weak.upgrade())
            .unwrap_or_default();

        if let Some((evicted_id, evicted)) =
            self.recent.push(conversation_id.to_string(), Arc::clone(&slot))
        {
            // `evicted` itself is one reference; anything more is a running or queued turn
            if evicted_id != conversation_id && Arc::strong_count(&evicted) > 1 {
                tracing::debug!(
                    conversation = evicted_id.as_str(),
                    "parking busy conversation"
                );
                self.parked.insert(evicted_id, Arc::downgrade(&evicted));
            }
        }

        slot
    }

    fn peek(&self, conversation_id: &str) -> Option<Slot> {
        self.recent
            .peek(conversation_id)
            .map(Arc::clone)
            .or_else(|| self.parked.get(conversation_id).and_then(Weak::upgrade))
    }

    fn remove(&mut self, conversation_id: &str) -> bool {
        let recent = self.recent.pop(conversation_id).is_some();
        let parked = self
            .parked
            .remove(conversation_id)
            .is_some_and(|weak| weak.strong_count() > 0);
        recent || parked
    }

    fn len(&self) -> usize {
        let parked = self.parked.values().filter(|w| w.strong_count() > 0).count();
        self.recent.len() + parked
    }
}

/// Bounded LRU of conversation slots
///
/// Least recently used idle conversations are evicted once capacity is
/// reached; an evicted conversation simply starts over without a previous
/// key. A conversation with a turn in flight is never dropped, so later
/// turns still queue behind it.
#[derive(Debug)]
pub struct ConversationRegistry {
    pipeline: MamaPipeline,
    slots: StdMutex<Slots>,
}

impl ConversationRegistry {
    /// Capacity 0 falls back to [`DEFAULT_MAX_CONVERSATIONS`]
    pub fn new(pipeline: MamaPipeline, capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity)
            .or_else(|| NonZeroUsize::new(DEFAULT_MAX_CONVERSATIONS))
            .unwrap_or(NonZeroUsize::MIN);
        Self {
            pipeline,
            slots: StdMutex::new(Slots {
                recent: LruCache::new(cap),
                parked: HashMap::new(),
            }),
        }
    }

    pub fn from_config(pipeline: MamaPipeline, config: &SessionConfig) -> Self {
        Self::new(pipeline, config.max_conversations)
    }

    fn slots(&self) -> Result<std::sync::MutexGuard<'_, Slots>> {
        self.slots
            .lock()
            .map_err(|_| BrainError::General("conversation registry lock poisoned".to_string()))
    }

    fn slot(&self, conversation_id: &str) -> Result<Slot> {
        Ok(self.slots()?.get_or_insert(conversation_id))
    }

    /// Run the pipeline for one conversation turn.
    ///
    /// Holds the conversation's lock for the whole run so concurrent turns in
    /// the same conversation are serialized. On success the selected template
    /// key replaces the stored one (knowledge answers clear it); on failure
    /// the stored state is left untouched.
    pub async fn respond(
        &self,
        conversation_id: &str,
        message: &str,
        lookup: &dyn KnowledgeLookup,
        observer: Option<&dyn StepObserver>,
        aggregate_seed: Option<u64>,
    ) -> Result<PipelineResult> {
        let slot = self.slot(conversation_id)?;
        let mut state = slot.lock().await;

        let result = self
            .pipeline
            .run(
                message,
                lookup,
                observer,
                state.last_template_key.as_deref(),
                aggregate_seed,
            )
            .await?;

        state.last_template_key = result.selected_template_key.clone();
        state.turns += 1;
        tracing::debug!(
            conversation = conversation_id,
            turns = state.turns,
            "conversation turn completed"
        );

        Ok(result)
    }

    /// Current state of a conversation, if tracked
    pub async fn state(&self, conversation_id: &str) -> Result<Option<ConversationState>> {
        let slot = self.slots()?.peek(conversation_id);
        match slot {
            Some(slot) => Ok(Some(slot.lock().await.clone())),
            None => Ok(None),
        }
    }

    /// Forget a conversation
    pub fn reset(&self, conversation_id: &str) -> Result<bool> {
        Ok(self.slots()?.remove(conversation_id))
    }

    pub fn len(&self) -> usize {
        self.slots().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots().map(|s| s.recent.cap().get()).unwrap_or(0)
    }
}

impl Default for ConversationRegistry {
    fn default() -> Self {
        Self::new(MamaPipeline::default(), DEFAULT_MAX_CONVERSATIONS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FailingKnowledge, StaticKnowledge};

    #[test]
    fn test_new_registry_is_empty() {
        let registry = ConversationRegistry::new(MamaPipeline::default(), 10);
        assert!(registry.is_empty());
        assert_eq!(registry.capacity(), 10);
    }

    #[test]
    fn test_zero_capacity_uses_default() {
        let registry = ConversationRegistry::new(MamaPipeline::default(), 0);
        assert_eq!(registry.capacity(), DEFAULT_MAX_CONVERSATIONS);
    }

    #[tokio::test]
    async fn test_respond_threads_last_key() {
        let registry = ConversationRegistry::default();
        let knowledge = StaticKnowledge::empty();

        let first = registry.respond("chat-1", "سلام", &knowledge, None, None).await.unwrap();
        let stored = registry.state("chat-1").await.unwrap().unwrap();
        assert_eq!(stored.last_template_key, first.selected_template_key);
        assert_eq!(stored.turns, 1);

        let second = registry.respond("chat-1", "سلام", &knowledge, None, None).await.unwrap();
        assert_ne!(first.selected_template_key, second.selected_template_key);
        assert_eq!(registry.state("chat-1").await.unwrap().unwrap().turns, 2);
    }

    #[tokio::test]
    async fn test_conversations_are_independent() {
        let registry = ConversationRegistry::default();
        let knowledge = StaticKnowledge::empty();

        let a = registry.respond("a", "سلام", &knowledge, None, None).await.unwrap();
        let b = registry.respond("b", "سلام", &knowledge, None, None).await.unwrap();
        assert_eq!(a.response_content, b.response_content);
        assert_eq!(registry.len(), 2);
    }

    #[tokio::test]
    async fn test_faq_answer_clears_key() {
        let registry = ConversationRegistry::default();
        registry
            .respond("c", "سلام", &StaticKnowledge::empty(), None, None)
            .await
            .unwrap();
        registry
            .respond("c", "سلام", &StaticKnowledge::answering("جواب"), None, None)
            .await
            .unwrap();

        let state = registry.state("c").await.unwrap().unwrap();
        assert_eq!(state.last_template_key, None);
    }

    #[tokio::test]
    async fn test_failed_turn_keeps_state() {
        let registry = ConversationRegistry::default();
        let first = registry
            .respond("d", "سلام", &StaticKnowledge::empty(), None, None)
            .await
            .unwrap();
        assert!(
            registry
                .respond("d", "سلام", &FailingKnowledge::fatal(), None, None)
                .await
                .is_err()
        );

        let state = registry.state("d").await.unwrap().unwrap();
        assert_eq!(state.last_template_key, first.selected_template_key);
        assert_eq!(state.turns, 1);
    }

    #[tokio::test]
    async fn test_lru_eviction_and_reset() {
        let registry = ConversationRegistry::new(MamaPipeline::default(), 2);
        let knowledge = StaticKnowledge::empty();

        for id in ["x", "y", "z"] {
            registry.respond(id, "سلام", &knowledge, None, None).await.unwrap();
        }
        assert_eq!(registry.len(), 2);
        assert!(registry.state("x").await.unwrap().is_none());

        assert!(registry.reset("y").unwrap());
        assert!(!registry.reset("y").unwrap());
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_busy_slot_survives_eviction() {
        let registry = ConversationRegistry::new(MamaPipeline::default(), 1);
        let held = registry.slot("busy").unwrap();
        held.lock().await.turns = 3;

        registry
            .respond("other", "سلام", &StaticKnowledge::empty(), None, None)
            .await
            .unwrap();
        assert_eq!(registry.len(), 2);

        let again = registry.slot("busy").unwrap();
        assert!(Arc::ptr_eq(&held, &again));
        assert_eq!(registry.state("busy").await.unwrap().unwrap().turns, 3);
    }

    #[tokio::test]
    async fn test_idle_parked_slot_is_released() {
        let registry = ConversationRegistry::new(MamaPipeline::default(), 1);
        let held = registry.slot("busy").unwrap();
        registry
            .respond("other", "سلام", &StaticKnowledge::empty(), None, None)
            .await
            .unwrap();
        drop(held);

        assert_eq!(registry.len(), 1);
        assert!(registry.state("busy").await.unwrap().is_none());
    }
}
