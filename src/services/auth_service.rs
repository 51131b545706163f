use async_trait::async_trait;
use log::{info, warn};
use reqwest::{Client, Response, StatusCode};
use serde_json::{json, Value};
use url::Url;
use crate::models::user::{AuthSession, SignUpOutcome, User};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The provider refused the request; carries its message for the user.
    #[error("{0}")]
    Rejected(String),

    #[error("Auth provider unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected auth provider response: {0}")]
    Decode(String),

    #[error("Invalid auth provider URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// The identity provider. Owns users and sessions; this app only holds the
/// access token it hands out.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError>;

    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, AuthError>;

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError>;

    /// `Ok(None)` when the token is missing, expired or revoked.
    async fn get_user(&self, access_token: &str) -> Result<Option<User>, AuthError>;
}

/// Supabase (GoTrue) REST client.
#[derive(Clone)]
pub struct SupabaseAuth {
    client: Client,
    base: Url,
    anon_key: String,
}

impl SupabaseAuth {
    pub fn new(base_url: &str, anon_key: impl Into<String>) -> Result<Self, AuthError> {
        let base = if base_url.ends_with('/') {
            Url::parse(base_url)?
        } else {
            Url::parse(&format!("{}/", base_url))?
        };
        Ok(SupabaseAuth {
            client: Client::builder().build()?,
            base,
            anon_key: anon_key.into(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, AuthError> {
        Ok(self.base.join(path)?)
    }

    async fn rejection(response: Response) -> AuthError {
        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);
        let message = ["error_description", "msg", "message", "error"]
            .iter()
            .find_map(|field| body.get(*field).and_then(Value::as_str))
            .map(str::to_string)
            .unwrap_or_else(|| format!("Request failed with status {}", status));
        AuthError::Rejected(message)
    }
}

#[async_trait]
impl AuthProvider for SupabaseAuth {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let mut url = self.endpoint("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");

        let response = self.client
            .post(url)
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }
        let session: AuthSession = response.json().await
            .map_err(|e| AuthError::Decode(e.to_string()))?;
        info!("User {} signed in", session.user.id);
        Ok(session)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, AuthError> {
        let response = self.client
            .post(self.endpoint("auth/v1/signup")?)
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }
        let body: Value = response.json().await
            .map_err(|e| AuthError::Decode(e.to_string()))?;

        // With email confirmation enabled the provider returns a bare user.
        match body.get("access_token").and_then(Value::as_str) {
            Some(token) => Ok(SignUpOutcome::SignedIn(token.to_string())),
            None => Ok(SignUpOutcome::ConfirmationRequired),
        }
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        let response = self.client
            .post(self.endpoint("auth/v1/logout")?)
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }
        Ok(())
    }

    async fn get_user(&self, access_token: &str) -> Result<Option<User>, AuthError> {
        let response = self.client
            .get(self.endpoint("auth/v1/user")?)
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                let user: User = response.json().await
                    .map_err(|e| AuthError::Decode(e.to_string()))?;
                Ok(Some(user))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                warn!("Access token rejected by auth provider");
                Ok(None)
            }
            _ => Err(Self::rejection(response).await),
        }
    }
}
