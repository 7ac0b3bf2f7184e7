//! Bounded conversation history for one chat session
//!
//! Ephemeral by design: created per chat window, cleared when the user starts
//! a new conversation, never persisted.

use crate::llm::ChatMessage;

/// Default cap on retained messages.
const DEFAULT_MAX_MESSAGES: usize = 50;

/// Ordered, bounded message history for one chat session.
///
/// After every insertion `len() <= max_messages` holds; overflow is corrected
/// by evicting the oldest message, one at a time, until the bound is restored.
pub struct ConversationManager {
    messages: Vec<ChatMessage>,
    max_messages: usize,
}

impl Default for ConversationManager {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_MESSAGES)
    }
}

impl ConversationManager {
    /// Create a manager bounded at `max_messages`.
    pub fn new(max_messages: usize) -> Self {
        Self {
            messages: Vec::new(),
            max_messages,
        }
    }

    /// Append a user message.
    pub fn add_user_message(&mut self, content: impl Into<String>) {
        self.add_message(ChatMessage::user(content));
    }

    /// Append an assistant message.
    pub fn add_assistant_message(&mut self, content: impl Into<String>) {
        self.add_message(ChatMessage::assistant(content));
    }

    /// Append a message, evicting from the front until the bound holds.
    pub fn add_message(&mut self, message: ChatMessage) {
        self.messages.push(message);

        // loop, not a single conditional: stays correct even if the bound is
        // smaller than the current size by more than one
        while self.messages.len() > self.max_messages {
            self.messages.remove(0);
        }
    }

    /// Drop the whole history.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Whether any messages are retained.
    pub fn has_messages(&self) -> bool {
        !self.messages.is_empty()
    }

    /// Borrow the history in chronological order.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Snapshot copy for an API call, insulating the provider from
    /// concurrent mutation of the history.
    pub fn messages_for_api(&self) -> Vec<ChatMessage> {
        self.messages.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn contents(manager: &ConversationManager) -> Vec<&str> {
        manager
            .messages()
            .iter()
            .map(|m| m.content.as_str())
            .collect()
    }

    #[test]
    fn test_messages_kept_in_insertion_order() {
        let mut manager = ConversationManager::default();
        manager.add_user_message("one");
        manager.add_assistant_message("two");
        manager.add_user_message("three");
        assert_eq!(contents(&manager), vec!["one", "two", "three"]);
    }

    #[test]
    fn test_fifo_eviction_at_bound() {
        let mut manager = ConversationManager::new(3);
        for text in ["A", "B", "C", "D", "E"] {
            manager.add_user_message(text);
        }
        assert_eq!(contents(&manager), vec!["C", "D", "E"]);
    }

    #[test]
    fn test_zero_bound_retains_nothing() {
        let mut manager = ConversationManager::new(0);
        manager.add_user_message("A");
        assert!(!manager.has_messages());
    }

    #[test]
    fn test_clear() {
        let mut manager = ConversationManager::default();
        manager.add_user_message("hello");
        assert!(manager.has_messages());
        manager.clear();
        assert!(!manager.has_messages());
        assert_eq!(manager.messages().len(), 0);
    }

    #[test]
    fn test_snapshot_is_independent_of_later_mutation() {
        let mut manager = ConversationManager::default();
        manager.add_user_message("first");
        let snapshot = manager.messages_for_api();
        manager.add_assistant_message("second");

        assert_eq!(snapshot.len(), 1);
        assert_eq!(manager.messages().len(), 2);
    }

    #[test]
    fn test_roles_recorded() {
        let mut manager = ConversationManager::default();
        manager.add_user_message("q");
        manager.add_assistant_message("a");
        assert_eq!(manager.messages()[0].role_str(), "user");
        assert_eq!(manager.messages()[1].role_str(), "assistant");
    }
}
