use crate::service::{CreateRequest, DeleteRequest, GetRequest, ListRequest, SessionService};
use crate::store::SessionStore;
use crate::{Session, SessionKey};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tripwise_core::{Event, Result};

/// Session service persisted to a single JSON file.
///
/// The whole store is rewritten after every mutation, so a conversation
/// survives process restarts. The write goes to a sibling temp file first
/// and is renamed into place.
pub struct FileSessionService {
    path: PathBuf,
    store: Mutex<SessionStore>,
}

impl FileSessionService {
    /// Load sessions from `path`, starting empty if the file does not exist.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let store = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => SessionStore::default(),
            Err(e) => return Err(e.into()),
        };
        tracing::debug!(path = %path.display(), "opened session file");
        Ok(Self { path, store: Mutex::new(store) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, store: &SessionStore) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let bytes = serde_json::to_vec_pretty(store)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl SessionService for FileSessionService {
    async fn create(&self, req: CreateRequest) -> Result<Box<dyn Session>> {
        let mut store = self.store.lock().await;
        let snapshot = store.create(req)?;
        self.persist(&store).await?;
        Ok(Box::new(snapshot))
    }

    async fn get(&self, req: GetRequest) -> Result<Option<Box<dyn Session>>> {
        let store = self.store.lock().await;
        Ok(store.get(&req).map(|s| Box::new(s) as Box<dyn Session>))
    }

    async fn list(&self, req: ListRequest) -> Result<Vec<Box<dyn Session>>> {
        let store = self.store.lock().await;
        Ok(store.list(&req).into_iter().map(|s| Box::new(s) as Box<dyn Session>).collect())
    }

    async fn delete(&self, req: DeleteRequest) -> Result<()> {
        let key = SessionKey::new(req.app_name, req.user_id, req.session_id);
        let mut store = self.store.lock().await;
        if store.delete(&key) {
            self.persist(&store).await?;
        }
        Ok(())
    }

    async fn append_event(&self, key: &SessionKey, event: Event) -> Result<()> {
        let mut store = self.store.lock().await;
        store.append_event(key, event)?;
        self.persist(&store).await
    }
}
