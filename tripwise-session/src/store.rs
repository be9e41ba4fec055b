use crate::service::{CreateRequest, GetRequest, ListRequest};
use crate::{SessionKey, SessionSnapshot};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tripwise_core::{
    Event, KEY_PREFIX_APP, KEY_PREFIX_TEMP, KEY_PREFIX_USER, Result, TripwiseError,
};
use uuid::Uuid;

type StateMap = HashMap<String, Value>;

#[derive(Clone, Debug, Serialize, Deserialize)]
struct SessionData {
    key: SessionKey,
    events: Vec<Event>,
    state: StateMap,
    updated_at: DateTime<Utc>,
}

/// Session records plus app- and user-scoped state shared across sessions.
///
/// Both session services keep one of these behind a lock; the file service
/// also serializes it wholesale.
#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct SessionStore {
    sessions: HashMap<String, SessionData>,
    app_state: HashMap<String, StateMap>,
    user_state: HashMap<String, HashMap<String, StateMap>>,
}

fn split_scopes(delta: &StateMap) -> (StateMap, StateMap, StateMap) {
    let mut app = StateMap::new();
    let mut user = StateMap::new();
    let mut session = StateMap::new();

    for (key, value) in delta {
        if let Some(clean_key) = key.strip_prefix(KEY_PREFIX_APP) {
            app.insert(clean_key.to_string(), value.clone());
        } else if let Some(clean_key) = key.strip_prefix(KEY_PREFIX_USER) {
            user.insert(clean_key.to_string(), value.clone());
        } else if !key.starts_with(KEY_PREFIX_TEMP) {
            session.insert(key.clone(), value.clone());
        }
    }

    (app, user, session)
}

fn merge_scopes(app: &StateMap, user: &StateMap, session: &StateMap) -> StateMap {
    let mut merged = session.clone();
    for (k, v) in app {
        merged.insert(format!("{KEY_PREFIX_APP}{k}"), v.clone());
    }
    for (k, v) in user {
        merged.insert(format!("{KEY_PREFIX_USER}{k}"), v.clone());
    }
    merged
}

impl SessionStore {
    pub(crate) fn create(&mut self, req: CreateRequest) -> Result<SessionSnapshot> {
        let session_id = req.session_id.unwrap_or_else(|| Uuid::new_v4().to_string());
        let key = SessionKey::new(req.app_name, req.user_id, session_id);
        if self.sessions.contains_key(&key.storage_key()) {
            return Err(TripwiseError::Session(format!("session {key} already exists")));
        }

        let (app_delta, user_delta, session_state) = split_scopes(&req.state);
        self.merge_shared(&key, app_delta, user_delta);

        let data = SessionData {
            key: key.clone(),
            events: Vec::new(),
            state: session_state,
            updated_at: Utc::now(),
        };
        let snapshot = self.snapshot(&data, None);
        self.sessions.insert(key.storage_key(), data);
        Ok(snapshot)
    }

    pub(crate) fn get(&self, req: &GetRequest) -> Option<SessionSnapshot> {
        let key = SessionKey::new(&req.app_name, &req.user_id, &req.session_id);
        self.sessions.get(&key.storage_key()).map(|data| self.snapshot(data, req.num_recent_events))
    }

    pub(crate) fn list(&self, req: &ListRequest) -> Vec<SessionSnapshot> {
        let mut result: Vec<SessionSnapshot> = self
            .sessions
            .values()
            .filter(|d| d.key.app_name == req.app_name && d.key.user_id == req.user_id)
            .map(|d| self.snapshot(d, None))
            .collect();
        result.sort_by(|a, b| a.key.session_id.cmp(&b.key.session_id));
        result
    }

    /// Returns whether a session was removed.
    pub(crate) fn delete(&mut self, key: &SessionKey) -> bool {
        self.sessions.remove(&key.storage_key()).is_some()
    }

    /// Record `event` and fold its state delta into the right scopes.
    /// `temp:` keys are dropped before the event is stored.
    pub(crate) fn append_event(&mut self, key: &SessionKey, mut event: Event) -> Result<()> {
        event.actions.state_delta.retain(|k, _| !k.starts_with(KEY_PREFIX_TEMP));
        let (app_delta, user_delta, session_delta) = split_scopes(&event.actions.state_delta);

        let data = self
            .sessions
            .get_mut(&key.storage_key())
            .ok_or_else(|| TripwiseError::Session(format!("session {key} not found")))?;
        data.state.extend(session_delta);
        data.updated_at = event.timestamp;
        data.events.push(event);

        self.merge_shared(key, app_delta, user_delta);
        Ok(())
    }

    fn merge_shared(&mut self, key: &SessionKey, app_delta: StateMap, user_delta: StateMap) {
        if !app_delta.is_empty() {
            self.app_state.entry(key.app_name.clone()).or_default().extend(app_delta);
        }
        if !user_delta.is_empty() {
            self.user_state
                .entry(key.app_name.clone())
                .or_default()
                .entry(key.user_id.clone())
                .or_default()
                .extend(user_delta);
        }
    }

    fn snapshot(&self, data: &SessionData, num_recent_events: Option<usize>) -> SessionSnapshot {
        let empty = StateMap::new();
        let app = self.app_state.get(&data.key.app_name).unwrap_or(&empty);
        let user = self
            .user_state
            .get(&data.key.app_name)
            .and_then(|m| m.get(&data.key.user_id))
            .unwrap_or(&empty);

        let start = match num_recent_events {
            Some(n) => data.events.len().saturating_sub(n),
            None => 0,
        };

        SessionSnapshot {
            key: data.key.clone(),
            state: merge_scopes(app, user, &data.state),
            events: data.events[start..].to_vec(),
            updated_at: data.updated_at,
        }
    }
}
