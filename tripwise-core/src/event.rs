use crate::model::LlmResponse;
use crate::types::Content;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

// State scope prefixes
pub const KEY_PREFIX_APP: &str = "app:";
pub const KEY_PREFIX_TEMP: &str = "temp:";
pub const KEY_PREFIX_USER: &str = "user:";

/// A single step of a conversation: user input, a stage reply, or a state update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub invocation_id: String,
    pub author: String,
    #[serde(flatten)]
    pub llm_response: LlmResponse,
    pub actions: EventActions,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventActions {
    pub state_delta: HashMap<String, serde_json::Value>,
}

impl Event {
    pub fn new(invocation_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            invocation_id: invocation_id.into(),
            author: String::new(),
            llm_response: LlmResponse::default(),
            actions: EventActions::default(),
        }
    }

    /// Event authored by `author` carrying a complete text reply.
    pub fn reply(
        invocation_id: impl Into<String>,
        author: impl Into<String>,
        content: Content,
    ) -> Self {
        let mut event = Self::new(invocation_id);
        event.author = author.into();
        event.llm_response = LlmResponse::new(content);
        event
    }

    pub fn with_state(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.actions.state_delta.insert(key.into(), value);
        self
    }

    pub fn content(&self) -> Option<&Content> {
        self.llm_response.content.as_ref()
    }

    pub fn text(&self) -> Option<String> {
        self.llm_response.text()
    }

    /// True for a complete, user-facing text reply.
    pub fn is_final_response(&self) -> bool {
        if self.llm_response.partial || !self.llm_response.turn_complete {
            return false;
        }
        match self.content() {
            Some(content) => {
                !content.parts.iter().any(|p| p.is_function_call()) && content.text().is_some()
            }
            None => false,
        }
    }
}
