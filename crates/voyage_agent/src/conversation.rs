//! Conversation state.
//!
//! A [`Conversation`] is the append-only log of [`Turn`]s for one session.
//! Appends are checked so the log always satisfies the tool-call pairing
//! rule: each tool result answers the next unanswered request of the nearest
//! preceding assistant turn, and no other turn may be appended while a
//! request is unanswered.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use voyage_models::llm::{Role, ToolCall, ToolResult, Turn};

/// Errors raised when an append would break the conversation invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversationError {
    /// A tool result was appended with no outstanding request.
    #[error("tool result for '{call_id}' has no outstanding request")]
    UnexpectedToolResult {
        /// Call id carried by the result.
        call_id: String,
    },

    /// A tool result answered a request out of order.
    #[error("expected tool result for '{expected}', got '{actual}'")]
    CallIdMismatch {
        /// Id of the next outstanding request.
        expected: String,
        /// Id carried by the result.
        actual: String,
    },

    /// A non-result turn was appended while requests are outstanding.
    #[error("{count} tool request(s) still awaiting results")]
    PendingToolCalls {
        /// Number of unanswered requests.
        count: usize,
    },

    /// The conversation does not end with input the model should answer.
    #[error("conversation has no input awaiting a reply")]
    NothingToAnswer,
}

/// Ordered log of conversation turns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    /// Creates a conversation holding only a system prompt.
    pub fn new(system: impl Into<String>) -> Self {
        Self {
            turns: vec![Turn::system(system)],
        }
    }

    /// Creates a conversation seeded with a system prompt and the first human message.
    pub fn seeded(system: impl Into<String>, human: impl Into<String>) -> Self {
        Self {
            turns: vec![Turn::system(system), Turn::human(human)],
        }
    }

    /// Rebuilds a conversation from stored turns, checking the pairing rule.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConversationError`] encountered while replaying.
    pub fn from_turns(turns: impl IntoIterator<Item = Turn>) -> Result<Self, ConversationError> {
        let mut conversation = Self::default();
        for turn in turns {
            conversation.push(turn)?;
        }
        Ok(conversation)
    }

    /// Appends any turn, enforcing the pairing rule.
    ///
    /// # Errors
    ///
    /// See [`ConversationError`].
    pub fn push(&mut self, turn: Turn) -> Result<(), ConversationError> {
        match &turn {
            Turn::ToolResult(result) => {
                let Some(expected) = self.pending_calls().first() else {
                    return Err(ConversationError::UnexpectedToolResult {
                        call_id: result.call_id.clone(),
                    });
                };
                if expected.id != result.call_id {
                    return Err(ConversationError::CallIdMismatch {
                        expected: expected.id.clone(),
                        actual: result.call_id.clone(),
                    });
                }
            }
            _ => {
                let count = self.pending_calls().len();
                if count > 0 {
                    return Err(ConversationError::PendingToolCalls { count });
                }
            }
        }
        self.turns.push(turn);
        Ok(())
    }

    /// Appends a human message.
    ///
    /// # Errors
    ///
    /// Fails while tool requests are outstanding.
    pub fn push_human(&mut self, content: impl Into<String>) -> Result<(), ConversationError> {
        self.push(Turn::human(content))
    }

    /// Appends an assistant turn.
    ///
    /// # Errors
    ///
    /// Fails while tool requests are outstanding.
    pub fn push_assistant(
        &mut self,
        content: Option<String>,
        tool_calls: Vec<ToolCall>,
    ) -> Result<(), ConversationError> {
        self.push(Turn::Assistant {
            content,
            tool_calls,
        })
    }

    /// Appends a tool result answering the next outstanding request.
    ///
    /// # Errors
    ///
    /// Fails when the result does not answer the next outstanding request.
    pub fn push_tool_result(&mut self, result: ToolResult) -> Result<(), ConversationError> {
        self.push(Turn::ToolResult(result))
    }

    /// Returns the requests of the latest assistant turn that have no result yet,
    /// in request order.
    #[must_use]
    pub fn pending_calls(&self) -> &[ToolCall] {
        let mut answered = 0;
        for turn in self.turns.iter().rev() {
            match turn {
                Turn::ToolResult(_) => answered += 1,
                Turn::Assistant { tool_calls, .. } => {
                    return tool_calls.get(answered..).unwrap_or_default();
                }
                _ => return &[],
            }
        }
        &[]
    }

    /// Returns whether the model should be asked for the next turn.
    ///
    /// True when the log ends with a human message or with a complete batch
    /// of tool results.
    #[must_use]
    pub fn awaits_reply(&self) -> bool {
        match self.turns.last() {
            Some(Turn::Human { .. }) => true,
            Some(Turn::ToolResult(_)) => self.pending_calls().is_empty(),
            _ => false,
        }
    }

    /// Returns all turns in order.
    #[must_use]
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Returns the last turn.
    #[must_use]
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Returns the number of turns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Returns whether the conversation is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Returns the roles of all turns, in order.
    #[must_use]
    pub fn roles(&self) -> Vec<Role> {
        self.turns.iter().map(Turn::role).collect()
    }

    /// Returns the text of the most recent assistant turn without tool requests.
    #[must_use]
    pub fn last_assistant_text(&self) -> Option<&str> {
        self.turns.iter().rev().find_map(|turn| match turn {
            Turn::Assistant {
                content,
                tool_calls,
            } if tool_calls.is_empty() => Some(content.as_deref().unwrap_or_default()),
            _ => None,
        })
    }

    /// Consumes the conversation, returning its turns.
    #[must_use]
    pub fn into_turns(self) -> Vec<Turn> {
        self.turns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn two_calls() -> Vec<ToolCall> {
        vec![
            ToolCall::new("call_1", "city_code", json!({"city_name": "Bengaluru"})),
            ToolCall::new("call_2", "city_code", json!({"city_name": "Mumbai"})),
        ]
    }

    #[test]
    fn results_must_follow_request_order() {
        let mut conv = Conversation::seeded("sys", "hi");
        conv.push_assistant(None, two_calls()).unwrap();

        let err = conv
            .push_tool_result(ToolResult::success("call_2", "city_code", json!("BOM")))
            .unwrap_err();
        assert_eq!(
            err,
            ConversationError::CallIdMismatch {
                expected: "call_1".into(),
                actual: "call_2".into(),
            }
        );

        conv.push_tool_result(ToolResult::success("call_1", "city_code", json!("BLR")))
            .unwrap();
        assert_eq!(conv.pending_calls().len(), 1);
        assert!(!conv.awaits_reply());

        conv.push_tool_result(ToolResult::success("call_2", "city_code", json!("BOM")))
            .unwrap();
        assert!(conv.pending_calls().is_empty());
        assert!(conv.awaits_reply());
    }

    #[test]
    fn other_turns_blocked_while_calls_pending() {
        let mut conv = Conversation::seeded("sys", "hi");
        conv.push_assistant(None, two_calls()).unwrap();
        assert_eq!(
            conv.push_human("hello?").unwrap_err(),
            ConversationError::PendingToolCalls { count: 2 }
        );
    }

    #[test]
    fn stray_tool_result_is_rejected() {
        let mut conv = Conversation::seeded("sys", "hi");
        let err = conv
            .push_tool_result(ToolResult::success("call_1", "x", json!(null)))
            .unwrap_err();
        assert!(matches!(err, ConversationError::UnexpectedToolResult { .. }));
    }

    #[test]
    fn final_answer_and_follow_up() {
        let mut conv = Conversation::seeded("sys", "hi");
        conv.push_assistant(Some("Hello!".into()), vec![]).unwrap();
        assert_eq!(conv.last_assistant_text(), Some("Hello!"));
        assert!(!conv.awaits_reply());

        conv.push_human("and hotels?").unwrap();
        assert!(conv.awaits_reply());
        assert_eq!(
            conv.roles(),
            [Role::System, Role::Human, Role::Assistant, Role::Human]
        );
    }

    #[test]
    fn serde_replay_revalidates() {
        let mut conv = Conversation::seeded("sys", "hi");
        conv.push_assistant(None, two_calls()).unwrap();
        conv.push_tool_result(ToolResult::success("call_1", "city_code", json!("BLR")))
            .unwrap();

        let encoded = serde_json::to_value(&conv).unwrap();
        let turns: Vec<Turn> = serde_json::from_value(encoded).unwrap();
        let restored = Conversation::from_turns(turns).unwrap();
        assert_eq!(restored, conv);
        assert_eq!(restored.pending_calls()[0].id, "call_2");
    }
}
