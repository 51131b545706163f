#![allow(dead_code)]

use std::sync::Arc;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use actix_web::test::TestRequest;
use async_trait::async_trait;
use mockall::mock;
use serde_json::Value;

use chat_portal::models::message::{ChatRequest, Message};
use chat_portal::models::settings::Settings;
use chat_portal::models::thread::ThreadSummary;
use chat_portal::models::user::{AuthSession, SignUpOutcome, User};
use chat_portal::routes::app_state::AppState;
use chat_portal::services::auth_service::{AuthError, AuthProvider};
use chat_portal::services::backend_client::{BackendError, ChatBackend};
use chat_portal::views::Views;

pub const SESSION_COOKIE: &str = "chat_portal";
pub const PROMPT: &str = "You are a helpful AI assistant.";

mock! {
    pub Backend {}

    #[async_trait]
    impl ChatBackend for Backend {
        async fn list_threads(&self, settings: &Settings) -> Result<Vec<ThreadSummary>, BackendError>;
        async fn load_history(&self, settings: &Settings, thread_id: &str) -> Result<Vec<Message>, BackendError>;
        async fn send_message(&self, settings: &Settings, request: &ChatRequest) -> Result<String, BackendError>;
        async fn probe(&self, settings: &Settings) -> Result<Value, BackendError>;
    }
}

mock! {
    pub Auth {}

    #[async_trait]
    impl AuthProvider for Auth {
        async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError>;
        async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, AuthError>;
        async fn sign_out(&self, access_token: &str) -> Result<(), AuthError>;
        async fn get_user(&self, access_token: &str) -> Result<Option<User>, AuthError>;
    }
}

pub fn test_user() -> User {
    User { id: "user-1".to_string(), email: Some("ada@example.com".to_string()) }
}

/// An auth provider that accepts any password and recognises "token-1".
pub fn signed_in_auth() -> MockAuth {
    let mut auth = MockAuth::new();
    auth.expect_sign_in().returning(|_, _| {
        Ok(AuthSession {
            access_token: "token-1".to_string(),
            refresh_token: None,
            user: test_user(),
        })
    });
    auth.expect_get_user().returning(|token| {
        if token == "token-1" { Ok(Some(test_user())) } else { Ok(None) }
    });
    auth.expect_sign_out().returning(|_| Ok(()));
    auth
}

pub fn app_state(backend: MockBackend, auth: MockAuth) -> AppState {
    app_state_with(Arc::new(backend), auth)
}

pub fn app_state_with(backend: Arc<dyn ChatBackend>, auth: MockAuth) -> AppState {
    AppState::new(backend, Arc::new(auth), Views::new().unwrap(), PROMPT)
}

/// A backend whose `/chat` never answers.
pub struct StalledBackend {
    pub history: Vec<Message>,
}

#[async_trait]
impl ChatBackend for StalledBackend {
    async fn list_threads(&self, _settings: &Settings) -> Result<Vec<ThreadSummary>, BackendError> {
        Ok(vec![])
    }

    async fn load_history(&self, _settings: &Settings, _thread_id: &str) -> Result<Vec<Message>, BackendError> {
        Ok(self.history.clone())
    }

    async fn send_message(&self, _settings: &Settings, _request: &ChatRequest) -> Result<String, BackendError> {
        std::future::pending().await
    }

    async fn probe(&self, _settings: &Settings) -> Result<Value, BackendError> {
        Ok(Value::Null)
    }
}

pub fn session_key() -> Key {
    Key::generate()
}

/// Minimal cookie jar: remembers the latest session cookie.
#[derive(Default)]
pub struct Jar {
    cookie: Option<Cookie<'static>>,
}

impl Jar {
    pub fn attach(&self, request: TestRequest) -> TestRequest {
        match &self.cookie {
            Some(cookie) => request.cookie(cookie.clone()),
            None => request,
        }
    }

    pub fn remember<B>(&mut self, response: &ServiceResponse<B>) {
        if let Some(cookie) = response.response().cookies().find(|c| c.name() == SESSION_COOKIE) {
            self.cookie = Some(cookie.into_owned());
        }
    }
}

pub fn location<B>(response: &ServiceResponse<B>) -> String {
    response
        .headers()
        .get("Location")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
