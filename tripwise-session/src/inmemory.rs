use crate::service::{CreateRequest, DeleteRequest, GetRequest, ListRequest, SessionService};
use crate::store::SessionStore;
use crate::{Session, SessionKey};
use async_trait::async_trait;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tripwise_core::{Event, Result, TripwiseError};

/// Process-local session service. Sessions live as long as the service.
#[derive(Default)]
pub struct InMemorySessionService {
    store: RwLock<SessionStore>,
}

impl InMemorySessionService {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, SessionStore>> {
        self.store.read().map_err(|_| TripwiseError::Session("session store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, SessionStore>> {
        self.store.write().map_err(|_| TripwiseError::Session("session store lock poisoned".into()))
    }
}

#[async_trait]
impl SessionService for InMemorySessionService {
    async fn create(&self, req: CreateRequest) -> Result<Box<dyn Session>> {
        let snapshot = self.write()?.create(req)?;
        Ok(Box::new(snapshot))
    }

    async fn get(&self, req: GetRequest) -> Result<Option<Box<dyn Session>>> {
        Ok(self.read()?.get(&req).map(|s| Box::new(s) as Box<dyn Session>))
    }

    async fn list(&self, req: ListRequest) -> Result<Vec<Box<dyn Session>>> {
        Ok(self.read()?.list(&req).into_iter().map(|s| Box::new(s) as Box<dyn Session>).collect())
    }

    async fn delete(&self, req: DeleteRequest) -> Result<()> {
        let key = SessionKey::new(req.app_name, req.user_id, req.session_id);
        self.write()?.delete(&key);
        Ok(())
    }

    async fn append_event(&self, key: &SessionKey, event: Event) -> Result<()> {
        self.write()?.append_event(key, event)
    }
}
