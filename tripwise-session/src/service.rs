use crate::{Session, SessionKey};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tripwise_core::{Event, Result};

#[derive(Debug, Clone)]
pub struct CreateRequest {
    pub app_name: String,
    pub user_id: String,
    pub session_id: Option<String>,
    pub state: HashMap<String, Value>,
}

#[derive(Debug, Clone)]
pub struct GetRequest {
    pub app_name: String,
    pub user_id: String,
    pub session_id: String,
    pub num_recent_events: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct ListRequest {
    pub app_name: String,
    pub user_id: String,
}

#[derive(Debug, Clone)]
pub struct DeleteRequest {
    pub app_name: String,
    pub user_id: String,
    pub session_id: String,
}

impl GetRequest {
    pub fn for_key(key: &SessionKey) -> Self {
        Self {
            app_name: key.app_name.clone(),
            user_id: key.user_id.clone(),
            session_id: key.session_id.clone(),
            num_recent_events: None,
        }
    }
}

#[async_trait]
pub trait SessionService: Send + Sync {
    async fn create(&self, req: CreateRequest) -> Result<Box<dyn Session>>;
    async fn get(&self, req: GetRequest) -> Result<Option<Box<dyn Session>>>;
    async fn list(&self, req: ListRequest) -> Result<Vec<Box<dyn Session>>>;
    async fn delete(&self, req: DeleteRequest) -> Result<()>;
    async fn append_event(&self, key: &SessionKey, event: Event) -> Result<()>;

    /// Return the session for `key`, creating an empty one the first time.
    async fn get_or_create(&self, key: &SessionKey) -> Result<Box<dyn Session>> {
        if let Some(session) = self.get(GetRequest::for_key(key)).await? {
            return Ok(session);
        }
        tracing::info!(session = %key, "creating session");
        self.create(CreateRequest {
            app_name: key.app_name.clone(),
            user_id: key.user_id.clone(),
            session_id: Some(key.session_id.clone()),
            state: HashMap::new(),
        })
        .await
    }
}
