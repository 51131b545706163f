use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use log::info;
use crate::services::backend_client::BackendError;
use crate::services::chat_service::{ChatController, PendingSend, SendError};

pub type SharedController = Arc<Mutex<ChatController>>;

/// Controllers untouched for this long are dropped.
pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(30 * 60);

struct Entry {
    controller: SharedController,
    last_seen: Instant,
}

/// Chat controllers keyed by viewer id. Each viewer owns exactly one
/// controller; nothing here survives a restart.
#[derive(Clone)]
pub struct ChatSessionManager {
    controllers: Arc<Mutex<HashMap<String, Entry>>>,
    idle_ttl: Duration,
}

impl ChatSessionManager {
    pub fn new() -> Self {
        Self::with_idle_ttl(DEFAULT_IDLE_TTL)
    }

    pub fn with_idle_ttl(idle_ttl: Duration) -> Self {
        ChatSessionManager {
            controllers: Arc::new(Mutex::new(HashMap::new())),
            idle_ttl,
        }
    }

    /// Returns the viewer's controller, creating an empty one on first use.
    /// Idle controllers that no request holds are evicted on the way.
    pub fn controller(&self, viewer_id: &str) -> SharedController {
        let mut controllers = lock(&self.controllers);
        let before = controllers.len();
        controllers.retain(|_, entry| {
            entry.last_seen.elapsed() < self.idle_ttl || Arc::strong_count(&entry.controller) > 1
        });
        if controllers.len() < before {
            info!("Evicted {} idle chat controllers", before - controllers.len());
        }

        let entry = controllers.entry(viewer_id.to_string()).or_insert_with(|| Entry {
            controller: Arc::new(Mutex::new(ChatController::new())),
            last_seen: Instant::now(),
        });
        entry.last_seen = Instant::now();
        entry.controller.clone()
    }

    /// Drops the viewer's transcript, e.g. on sign-out.
    pub fn remove(&self, viewer_id: &str) {
        lock(&self.controllers).remove(viewer_id);
    }

    pub fn len(&self) -> usize {
        lock(&self.controllers).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ChatSessionManager {
    fn default() -> Self {
        Self::new()
    }
}

/// A send that is waiting on the backend. If the request handling it is
/// dropped before `finish` runs, the optimistic message is rolled back.
pub struct InFlightSend {
    controller: SharedController,
    pending: Option<PendingSend>,
}

impl InFlightSend {
    pub fn new(controller: SharedController, pending: PendingSend) -> Self {
        InFlightSend { controller, pending: Some(pending) }
    }

    pub fn finish(mut self, outcome: Result<String, BackendError>) -> Result<(), SendError> {
        match self.pending.take() {
            Some(pending) => lock(&self.controller).finish_send(pending, outcome),
            None => Ok(()),
        }
    }
}

impl Drop for InFlightSend {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            lock(&self.controller).abandon_send(pending);
        }
    }
}

/// Locks a mutex, recovering the data if a previous holder panicked.
pub fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
