use crate::types::Content;
use serde_json::Value;
use std::collections::HashMap;

pub trait ReadonlyContext: Send + Sync {
    fn invocation_id(&self) -> &str;
    fn agent_name(&self) -> &str;
    fn user_id(&self) -> &str;
    fn app_name(&self) -> &str;
    fn session_id(&self) -> &str;
    fn user_content(&self) -> &Content;
}

/// Live view of the session an invocation runs against.
///
/// Writes go through `&self`: stages in a pipeline observe the deltas of
/// the stages before them while the invocation is still running.
pub trait Session: Send + Sync {
    fn id(&self) -> &str;
    fn app_name(&self) -> &str;
    fn user_id(&self) -> &str;
    fn get_state(&self, key: &str) -> Option<Value>;
    fn state(&self) -> HashMap<String, Value>;
    fn apply_state_delta(&self, delta: &HashMap<String, Value>);
    fn conversation_history(&self) -> Vec<Content>;
    fn append_to_history(&self, content: Content);
}

pub trait InvocationContext: ReadonlyContext {
    fn session(&self) -> &dyn Session;
}

/// Text of the current user turn, trimmed. Empty when the turn has no text.
pub fn user_text<C: ReadonlyContext + ?Sized>(ctx: &C) -> String {
    ctx.user_content().text().map(|t| t.trim().to_string()).unwrap_or_default()
}
