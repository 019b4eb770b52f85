use crate::config::AppConfig;
use crate::domain::auth::AuthSession;
use crate::domain::catalog::PhaseCatalog;
use crate::domain::navigation::Navigator;
use crate::services::chat::ChatWidget;
use crate::services::latency::{InstantPacer, Pacer, RandomPacer, RandomSource, ThreadRandom};
use crate::services::triage::UploadBoard;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

/// Everything one client sees: its login, what is on screen, open chats and uploads.
pub struct Workspace {
    pub auth: AuthSession,
    pub navigator: Navigator,
    pub chats: HashMap<Uuid, ChatWidget>,
    pub uploads: UploadBoard,
    pub last_seen: DateTime<Utc>,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            auth: AuthSession::new(),
            navigator: Navigator::default(),
            chats: HashMap::new(),
            uploads: UploadBoard::default(),
            last_seen: Utc::now(),
        }
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_seen = now;
        self.auth.expire_error(now);
    }

    /// Logging out tears the dashboard down: pending chat replies and analyses are dropped
    /// when they land.
    pub fn sign_out(&mut self) {
        self.auth.logout();
        self.navigator.reset();
        self.chats.clear();
        self.uploads = UploadBoard::default();
    }
}

pub type WorkspaceHandle = Arc<Mutex<Workspace>>;

pub struct AppState {
    pub config: AppConfig,
    pub catalog: &'static PhaseCatalog,
    pub pacer: Arc<dyn Pacer>,
    pub rng: Arc<dyn RandomSource>,
    pub session_key: Vec<u8>,
    pub workspaces: RwLock<HashMap<Uuid, WorkspaceHandle>>, // session id -> workspace
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let pacer: Arc<dyn Pacer> = if config.simulated_latency {
            Arc::new(RandomPacer)
        } else {
            Arc::new(InstantPacer)
        };
        Self::with_providers(config, pacer, Arc::new(ThreadRandom))
    }

    pub fn with_providers(
        config: AppConfig,
        pacer: Arc<dyn Pacer>,
        rng: Arc<dyn RandomSource>,
    ) -> Self {
        let session_key = config.session_key.clone();
        Self {
            config,
            catalog: PhaseCatalog::global(),
            pacer,
            rng,
            session_key,
            workspaces: RwLock::new(HashMap::new()),
        }
    }

    pub async fn workspace(&self, id: Uuid) -> Option<WorkspaceHandle> {
        self.workspaces.read().await.get(&id).cloned()
    }

    pub async fn open_workspace(&self) -> (Uuid, WorkspaceHandle) {
        let id = Uuid::new_v4();
        let handle: WorkspaceHandle = Arc::new(Mutex::new(Workspace::new()));
        self.workspaces.write().await.insert(id, handle.clone());
        tracing::debug!("Opened workspace {}", id);
        (id, handle)
    }

    /// Drops workspaces idle for longer than the session lifetime. Returns how many went.
    pub async fn purge_idle(&self, now: DateTime<Utc>) -> usize {
        let cutoff = now - Duration::hours(self.config.session_ttl_hours);
        let mut workspaces = self.workspaces.write().await;
        let before = workspaces.len();
        let mut keep = HashMap::with_capacity(before);
        for (id, handle) in workspaces.drain() {
            // a locked workspace is in use right now
            let idle = match handle.try_lock() {
                Ok(ws) => ws.last_seen < cutoff,
                Err(_) => false,
            };
            if !idle {
                keep.insert(id, handle);
            }
        }
        *workspaces = keep;
        before - workspaces.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_purge_idle_workspaces() {
        let state = AppState::new(AppConfig::for_tests());
        let (stale, stale_ws) = state.open_workspace().await;
        let (fresh, _) = state.open_workspace().await;
        stale_ws.lock().await.last_seen = Utc::now() - Duration::hours(30);

        assert_eq!(state.purge_idle(Utc::now()).await, 1);
        assert!(state.workspace(stale).await.is_none());
        assert!(state.workspace(fresh).await.is_some());
    }

    #[tokio::test]
    async fn test_sign_out_resets_views() {
        let mut ws = Workspace::new();
        ws.auth.begin_login().unwrap();
        ws.auth
            .finish_login("admin@cognizant.com", "password123", Utc::now())
            .unwrap();
        ws.navigator
            .begin(crate::domain::navigation::NavTarget::Phase("reports".into()))
            .unwrap();

        ws.sign_out();
        assert!(!ws.auth.is_authenticated());
        assert!(!ws.navigator.is_loading());
        assert!(ws.chats.is_empty());
    }
}
