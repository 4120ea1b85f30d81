use crate::config::PluginConfig;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Authenticated sessions (session token → user id)
    pub sessions: Arc<RwLock<HashMap<String, String>>>,

    /// Page hosting settings
    pub plugin: Arc<PluginConfig>,
}

impl AppState {
    pub fn new(plugin: PluginConfig) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            plugin: Arc::new(plugin),
        }
    }

    /// Record a session issued by the login surface
    pub async fn register_session(&self, token: impl Into<String>, user_id: impl Into<String>) {
        let mut sessions = self.sessions.write().await;
        sessions.insert(token.into(), user_id.into());
    }

    pub async fn revoke_session(&self, token: &str) -> bool {
        let mut sessions = self.sessions.write().await;
        sessions.remove(token).is_some()
    }

    /// User id for a session token, if the session is known
    pub async fn user_for(&self, token: &str) -> Option<String> {
        let sessions = self.sessions.read().await;
        sessions.get(token).cloned()
    }
}
