use log::{error, info, warn};
use serde::Serialize;
use crate::models::message::{ChatRequest, Message};
use crate::models::settings::Settings;
use crate::services::backend_client::{BackendError, ChatBackend};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatPhase {
    LoadingHistory,
    Idle,
    Sending,
}

#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error("Message is empty")]
    BlankMessage,

    #[error("Please configure your backend settings first!")]
    NotConfigured,

    #[error("Please wait for the current reply before sending another message.")]
    Busy,

    #[error("No thread selected")]
    NoThread,

    #[error("Failed to send message. Please check your settings and try again.")]
    Backend(#[source] BackendError),
}

/// Marks a history fetch so a result for a thread the viewer already left is
/// dropped instead of overwriting the current transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryTicket(u64);

/// A send that has been applied optimistically and awaits the backend.
#[derive(Debug)]
pub struct PendingSend {
    pub request: ChatRequest,
    ticket: u64,
}

/// Owns the transcript of the thread one viewer is looking at.
#[derive(Debug)]
pub struct ChatController {
    thread_id: Option<String>,
    messages: Vec<Message>,
    phase: ChatPhase,
    generation: u64,
}

impl ChatController {
    pub fn new() -> Self {
        ChatController {
            thread_id: None,
            messages: Vec::new(),
            phase: ChatPhase::Idle,
            generation: 0,
        }
    }

    pub fn thread_id(&self) -> Option<&str> {
        self.thread_id.as_deref()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn phase(&self) -> ChatPhase {
        self.phase
    }

    pub fn is_viewing(&self, thread_id: &str) -> bool {
        self.thread_id.as_deref() == Some(thread_id)
    }

    /// Switches to `thread_id`, discarding the previous transcript.
    pub fn select_thread(&mut self, thread_id: &str) -> HistoryTicket {
        self.generation += 1;
        self.thread_id = Some(thread_id.to_string());
        self.messages.clear();
        self.phase = ChatPhase::LoadingHistory;
        HistoryTicket(self.generation)
    }

    /// Applies a fetched history. Returns false if the ticket is stale.
    pub fn history_loaded(&mut self, ticket: HistoryTicket, messages: Option<Vec<Message>>) -> bool {
        if ticket.0 != self.generation {
            return false;
        }
        self.messages = messages.unwrap_or_default();
        self.phase = ChatPhase::Idle;
        true
    }

    /// Validates a send and appends the user's message right away.
    pub fn begin_send(&mut self, message: &str, settings: &Settings, system_prompt: &str) -> Result<PendingSend, SendError> {
        if message.trim().is_empty() {
            return Err(SendError::BlankMessage);
        }
        if !settings.is_configured() {
            return Err(SendError::NotConfigured);
        }
        if self.phase != ChatPhase::Idle {
            return Err(SendError::Busy);
        }
        let thread_id = self.thread_id.clone().ok_or(SendError::NoThread)?;

        self.messages.push(Message::user(message));
        self.phase = ChatPhase::Sending;
        Ok(PendingSend {
            request: ChatRequest {
                thread_id,
                message: message.to_string(),
                system_prompt: system_prompt.to_string(),
            },
            ticket: self.generation,
        })
    }

    /// Applies the backend's answer to a pending send. On failure the
    /// optimistic entry is removed again.
    pub fn finish_send(&mut self, pending: PendingSend, outcome: Result<String, BackendError>) -> Result<(), SendError> {
        let current = pending.ticket == self.generation;
        if !current {
            warn!("Reply for thread {} arrived after the viewer moved on", pending.request.thread_id);
        }

        match outcome {
            Ok(reply) => {
                if current {
                    self.messages.push(Message::assistant(reply));
                    self.phase = ChatPhase::Idle;
                }
                Ok(())
            }
            Err(e) => {
                error!("Error sending message: {}", e);
                if current {
                    self.messages.pop();
                    self.phase = ChatPhase::Idle;
                }
                Err(SendError::Backend(e))
            }
        }
    }

    /// Rolls back a send whose request was abandoned before the backend
    /// answered. No-op once the viewer has moved to another thread.
    pub fn abandon_send(&mut self, pending: PendingSend) {
        if pending.ticket != self.generation || self.phase != ChatPhase::Sending {
            return;
        }
        warn!("Send to thread {} was abandoned; removing the pending message", pending.request.thread_id);
        self.messages.pop();
        self.phase = ChatPhase::Idle;
    }

    /// Whether showing `thread_id` needs a history fetch. A page load
    /// (`refresh`) always refetches unless a send is in flight for that
    /// thread; otherwise only a different thread or an unfinished load does.
    pub fn needs_history(&self, thread_id: &str, refresh: bool) -> bool {
        if !self.is_viewing(thread_id) {
            return true;
        }
        match self.phase {
            ChatPhase::Sending => false,
            ChatPhase::LoadingHistory => true,
            ChatPhase::Idle => refresh,
        }
    }
}

impl Default for ChatController {
    fn default() -> Self {
        Self::new()
    }
}

/// Fetches a thread's history. Missing settings skip the request and yield an
/// empty transcript; a failed request is logged and yields `None`.
pub async fn fetch_history(settings: &Settings, backend: &dyn ChatBackend, thread_id: &str) -> Option<Vec<Message>> {
    if !settings.is_configured() {
        info!("Settings not configured");
        return Some(Vec::new());
    }

    match backend.load_history(settings, thread_id).await {
        Ok(messages) => Some(messages),
        Err(e) => {
            error!("Failed to load chat history for {}: {}", thread_id, e);
            None
        }
    }
}
