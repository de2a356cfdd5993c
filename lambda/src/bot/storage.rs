//! In-memory conversation store, keyed by conversation id.
//!
//! Lives as long as the Lambda execution environment, so it is best-effort:
//! a cold start begins empty.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationData {
    pub message_count: u64,
    pub last_activity_id: Option<String>,
}

/// Entries are never evicted: the store grows with the number of distinct
/// conversations seen by one warm execution environment, which is bounded by
/// that environment's lifetime.
#[derive(Debug, Default)]
pub struct ConversationStore {
    conversations: Mutex<HashMap<String, ConversationData>>,
}

impl ConversationStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one inbound message and returns the updated entry.
    pub fn record(&self, conversation_id: &str, activity_id: Option<&str>) -> ConversationData {
        let mut conversations = self
            .conversations
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let entry = conversations
            .entry(conversation_id.to_string())
            .or_default();
        entry.message_count += 1;
        if let Some(id) = activity_id {
            entry.last_activity_id = Some(id.to_string());
        }
        entry.clone()
    }

    #[must_use]
    pub fn get(&self, conversation_id: &str) -> Option<ConversationData> {
        self.conversations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(conversation_id)
            .cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.conversations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_counts_per_conversation() {
        let store = ConversationStore::new();
        store.record("a", Some("1"));
        store.record("b", None);
        let a = store.record("a", Some("2"));

        assert_eq!(a.message_count, 2);
        assert_eq!(a.last_activity_id.as_deref(), Some("2"));
        assert_eq!(store.get("b").unwrap().message_count, 1);
        assert_eq!(store.len(), 2);
        assert!(store.get("c").is_none());
    }
}
