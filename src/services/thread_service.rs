use log::{error, info};
use crate::models::settings::Settings;
use crate::models::thread::ThreadSummary;
use crate::services::backend_client::ChatBackend;

/// Loads the sidebar's thread list.
///
/// Without settings there is nothing to ask, so the list is empty and no
/// request is made. A failed request leaves the list unset (`None`).
pub async fn load_threads(settings: &Settings, backend: &dyn ChatBackend) -> Option<Vec<ThreadSummary>> {
    if !settings.is_configured() {
        info!("Settings not configured; skipping thread list");
        return Some(Vec::new());
    }

    match backend.list_threads(settings).await {
        Ok(threads) => Some(threads),
        Err(e) => {
            error!("Error loading threads: {}", e);
            None
        }
    }
}
