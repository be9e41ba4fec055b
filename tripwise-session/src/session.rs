use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tripwise_core::Event;

/// (app, user, session) triple identifying one conversation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionKey {
    pub app_name: String,
    pub user_id: String,
    pub session_id: String,
}

impl SessionKey {
    pub fn new(
        app_name: impl Into<String>,
        user_id: impl Into<String>,
        session_id: impl Into<String>,
    ) -> Self {
        Self { app_name: app_name.into(), user_id: user_id.into(), session_id: session_id.into() }
    }

    pub(crate) fn storage_key(&self) -> String {
        format!("{}:{}:{}", self.app_name, self.user_id, self.session_id)
    }
}

impl std::fmt::Display for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.app_name, self.user_id, self.session_id)
    }
}

/// A stored session as returned by a [`crate::SessionService`].
pub trait Session: Send + Sync {
    fn key(&self) -> &SessionKey;
    fn state(&self) -> &HashMap<String, Value>;
    fn events(&self) -> &[Event];
    fn last_update_time(&self) -> DateTime<Utc>;

    fn id(&self) -> &str {
        &self.key().session_id
    }

    fn app_name(&self) -> &str {
        &self.key().app_name
    }

    fn user_id(&self) -> &str {
        &self.key().user_id
    }
}

/// Point-in-time copy of a session with app and user state merged in.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub key: SessionKey,
    pub state: HashMap<String, Value>,
    pub events: Vec<Event>,
    pub updated_at: DateTime<Utc>,
}

impl Session for SessionSnapshot {
    fn key(&self) -> &SessionKey {
        &self.key
    }

    fn state(&self) -> &HashMap<String, Value> {
        &self.state
    }

    fn events(&self) -> &[Event] {
        &self.events
    }

    fn last_update_time(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
