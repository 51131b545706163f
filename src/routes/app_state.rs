use std::sync::Arc;
use crate::chat_session_manager::ChatSessionManager;
use crate::models::thread::ThreadIdGenerator;
use crate::services::auth_service::AuthProvider;
use crate::services::backend_client::ChatBackend;
use crate::views::Views;

#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn ChatBackend>,
    pub auth: Arc<dyn AuthProvider>,
    pub session_manager: ChatSessionManager,
    pub thread_ids: Arc<ThreadIdGenerator>,
    pub views: Arc<Views>,
    pub system_prompt: String,
}

impl AppState {
    pub fn new(
        backend: Arc<dyn ChatBackend>,
        auth: Arc<dyn AuthProvider>,
        views: Views,
        system_prompt: impl Into<String>,
    ) -> Self {
        AppState {
            backend,
            auth,
            session_manager: ChatSessionManager::new(),
            thread_ids: Arc::new(ThreadIdGenerator::new()),
            views: Arc::new(views),
            system_prompt: system_prompt.into(),
        }
    }
}
