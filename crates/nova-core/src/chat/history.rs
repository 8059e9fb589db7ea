//! Bounded, ordered conversation history.

use nova_types::chat::{ChatTurn, TurnRole};
use nova_types::llm::Message;

/// Maximum number of turns kept in a conversation.
pub const HISTORY_CAPACITY: usize = 20;

/// Ordered turn history with FIFO eviction.
///
/// Length never exceeds [`HISTORY_CAPACITY`] after any mutation. Ordinals
/// keep increasing across evictions and clears.
#[derive(Debug, Default)]
pub struct ConversationHistory {
    turns: Vec<ChatTurn>,
    next_ordinal: u64,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn, evicting the oldest turns once the store is over capacity.
    pub fn append(&mut self, role: TurnRole, content: impl Into<String>) -> &ChatTurn {
        let turn = ChatTurn {
            role,
            content: content.into(),
            ordinal: self.next_ordinal,
        };
        self.next_ordinal += 1;
        self.turns.push(turn);

        if self.turns.len() > HISTORY_CAPACITY {
            let excess = self.turns.len() - HISTORY_CAPACITY;
            self.turns.drain(..excess);
        }

        &self.turns[self.turns.len() - 1]
    }

    /// Read-only ordered view used for prompt assembly.
    pub fn context(&self) -> &[ChatTurn] {
        &self.turns
    }

    /// The most recent assistant turn, if any.
    pub fn last_assistant(&self) -> Option<&ChatTurn> {
        self.turns
            .iter()
            .rev()
            .find(|turn| turn.role == TurnRole::Assistant)
    }

    /// Convert the history into backend messages.
    pub fn to_messages(&self) -> Vec<Message> {
        self.turns
            .iter()
            .map(|turn| Message {
                role: turn.role.into(),
                content: turn.content.clone(),
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
