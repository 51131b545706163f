use async_trait::async_trait;
use log::{debug, error};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use crate::models::message::{ChatRequest, ChatResponse, HistoryResponse, Message};
use crate::models::settings::Settings;
use crate::models::thread::{ThreadListResponse, ThreadSummary};

pub const API_KEY_HEADER: &str = "X-API-Key";

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("{status} {reason}")]
    Status { status: u16, reason: String },

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid response body: {0}")]
    Decode(String),
}

/// The chat backend configured on the settings page.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// `GET /threads`
    async fn list_threads(&self, settings: &Settings) -> Result<Vec<ThreadSummary>, BackendError>;

    /// `GET /threads/{thread_id}`
    async fn load_history(&self, settings: &Settings, thread_id: &str) -> Result<Vec<Message>, BackendError>;

    /// `POST /chat`, returns the assistant's reply.
    async fn send_message(&self, settings: &Settings, request: &ChatRequest) -> Result<String, BackendError>;

    /// `GET /`, used by the connection test.
    async fn probe(&self, settings: &Settings) -> Result<Value, BackendError>;
}

#[derive(Clone)]
pub struct HttpChatBackend {
    client: Client,
}

impl HttpChatBackend {
    pub fn new() -> Result<Self, BackendError> {
        let client = Client::builder().build()?;
        Ok(HttpChatBackend { client })
    }

    fn authorized(&self, builder: RequestBuilder, settings: &Settings) -> RequestBuilder {
        builder.header(API_KEY_HEADER, &settings.api_key)
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
        let status = response.status();
        if !status.is_success() {
            error!("Backend responded with {}", status);
            return Err(BackendError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }
        response.json::<T>().await.map_err(|e| BackendError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn list_threads(&self, settings: &Settings) -> Result<Vec<ThreadSummary>, BackendError> {
        let url = settings.endpoint("/threads");
        debug!("GET {}", url);
        let response = self.authorized(self.client.get(&url), settings).send().await?;
        let body: ThreadListResponse = Self::read_json(response).await?;
        Ok(body.threads.unwrap_or_default())
    }

    async fn load_history(&self, settings: &Settings, thread_id: &str) -> Result<Vec<Message>, BackendError> {
        let url = settings.endpoint(&format!("/threads/{}", thread_id));
        debug!("GET {}", url);
        let response = self.authorized(self.client.get(&url), settings).send().await?;
        let body: HistoryResponse = Self::read_json(response).await?;
        Ok(body.messages.unwrap_or_default())
    }

    async fn send_message(&self, settings: &Settings, request: &ChatRequest) -> Result<String, BackendError> {
        let url = settings.endpoint("/chat");
        debug!("POST {} for thread {}", url, request.thread_id);
        let response = self
            .authorized(self.client.post(&url), settings)
            .json(request)
            .send()
            .await?;
        let body: ChatResponse = Self::read_json(response).await?;
        Ok(body.response)
    }

    async fn probe(&self, settings: &Settings) -> Result<Value, BackendError> {
        let url = settings.endpoint("/");
        debug!("GET {}", url);
        let response = self.authorized(self.client.get(&url), settings).send().await?;
        Self::read_json(response).await
    }
}
