use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tripwise_core::{
    Agent, Content, InvocationContext as InvocationContextTrait, ReadonlyContext, Session,
};
use tripwise_session::SessionKey;

/// Live session view for one invocation.
///
/// Seeded from the stored session; stages write through it so later
/// stages observe earlier deltas without a round trip to the service.
/// `temp:` keys live here for the rest of the invocation and are dropped
/// when events are persisted.
pub struct MutableSession {
    key: SessionKey,
    state: RwLock<HashMap<String, Value>>,
    history: RwLock<Vec<Content>>,
}

impl MutableSession {
    pub fn new(stored: &dyn tripwise_session::Session) -> Self {
        let history = stored.events().iter().filter_map(|e| e.content().cloned()).collect();
        Self {
            key: stored.key().clone(),
            state: RwLock::new(stored.state().clone()),
            history: RwLock::new(history),
        }
    }

    pub fn key(&self) -> &SessionKey {
        &self.key
    }

    // A panicking writer leaves the map consistent (single inserts), so a
    // poisoned lock is still safe to read.
    fn read_state(&self) -> RwLockReadGuard<'_, HashMap<String, Value>> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, HashMap<String, Value>> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl Session for MutableSession {
    fn id(&self) -> &str {
        &self.key.session_id
    }

    fn app_name(&self) -> &str {
        &self.key.app_name
    }

    fn user_id(&self) -> &str {
        &self.key.user_id
    }

    fn get_state(&self, key: &str) -> Option<Value> {
        self.read_state().get(key).cloned()
    }

    fn state(&self) -> HashMap<String, Value> {
        self.read_state().clone()
    }

    fn apply_state_delta(&self, delta: &HashMap<String, Value>) {
        self.write_state().extend(delta.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    fn conversation_history(&self) -> Vec<Content> {
        self.history.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn append_to_history(&self, content: Content) {
        self.history.write().unwrap_or_else(|e| e.into_inner()).push(content);
    }
}

pub struct InvocationContext {
    invocation_id: String,
    agent: Arc<dyn Agent>,
    user_content: Content,
    session: Arc<MutableSession>,
}

impl InvocationContext {
    pub fn new(
        invocation_id: String,
        agent: Arc<dyn Agent>,
        user_content: Content,
        session: Arc<MutableSession>,
    ) -> Self {
        Self { invocation_id, agent, user_content, session }
    }
}

impl ReadonlyContext for InvocationContext {
    fn invocation_id(&self) -> &str {
        &self.invocation_id
    }

    fn agent_name(&self) -> &str {
        self.agent.name()
    }

    fn user_id(&self) -> &str {
        &self.session.key.user_id
    }

    fn app_name(&self) -> &str {
        &self.session.key.app_name
    }

    fn session_id(&self) -> &str {
        &self.session.key.session_id
    }

    fn user_content(&self) -> &Content {
        &self.user_content
    }
}

impl InvocationContextTrait for InvocationContext {
    fn session(&self) -> &dyn Session {
        self.session.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tripwise_core::Event;
    use tripwise_session::SessionSnapshot;

    fn stored() -> SessionSnapshot {
        let mut state = HashMap::new();
        state.insert("trip:destination".to_string(), json!("Paris"));
        SessionSnapshot {
            key: SessionKey::new("travel_agent", "usertravel1", "1002"),
            state,
            events: vec![Event::reply("inv-0", "user", Content::user("Paris")), Event::new("inv-0")],
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_seeded_from_stored_session() {
        let session = MutableSession::new(&stored());
        assert_eq!(session.id(), "1002");
        assert_eq!(session.get_state("trip:destination"), Some(json!("Paris")));
        assert_eq!(session.conversation_history().len(), 1);
    }

    #[test]
    fn test_apply_delta_keeps_temp_keys_for_the_invocation() {
        let session = MutableSession::new(&stored());
        let mut delta = HashMap::new();
        delta.insert("trip:dates".to_string(), json!("3 days"));
        delta.insert("temp:scratch".to_string(), json!(1));
        session.apply_state_delta(&delta);
        assert_eq!(session.get_state("trip:dates"), Some(json!("3 days")));
        assert_eq!(session.get_state("temp:scratch"), Some(json!(1)));
    }
}
