use std::env;
use actix_web::cookie::Key;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::warn;

pub fn init_logging() {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
}

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful AI assistant.";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Process configuration, read from the environment (and `.env` if present).
#[derive(Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub port: u16,
    pub auth_url: String,
    pub auth_anon_key: String,
    pub session_key: Key,
    pub system_prompt: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let port = match env::var("PORT") {
            Ok(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: "PORT",
                reason: e.to_string(),
            })?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(AppConfig {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            port,
            auth_url: required("AUTH_URL")?,
            auth_anon_key: required("AUTH_ANON_KEY")?,
            session_key: session_key(env::var("SESSION_KEY").ok())?,
            system_prompt: env::var("SYSTEM_PROMPT").unwrap_or_else(|_| DEFAULT_SYSTEM_PROMPT.to_string()),
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or(ConfigError::Missing(name))
}

/// Decodes the cookie signing key. Without one, sessions (and with them the
/// saved settings) do not survive a restart.
fn session_key(encoded: Option<String>) -> Result<Key, ConfigError> {
    let Some(encoded) = encoded.filter(|value| !value.trim().is_empty()) else {
        warn!("SESSION_KEY not set; generating a random key for this run");
        return Ok(Key::generate());
    };

    let bytes = STANDARD.decode(encoded.trim()).map_err(|e| ConfigError::Invalid {
        name: "SESSION_KEY",
        reason: e.to_string(),
    })?;
    Key::try_from(bytes.as_slice()).map_err(|e| ConfigError::Invalid {
        name: "SESSION_KEY",
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_session_key_generates_one() {
        assert!(session_key(None).is_ok());
        assert!(session_key(Some("  ".to_string())).is_ok());
    }

    #[test]
    fn short_session_key_is_rejected() {
        let encoded = STANDARD.encode([7u8; 16]);
        assert!(matches!(
            session_key(Some(encoded)),
            Err(ConfigError::Invalid { name: "SESSION_KEY", .. })
        ));
    }

    #[test]
    fn valid_session_key_round_trips() {
        let raw = [3u8; 64];
        let key = session_key(Some(STANDARD.encode(raw))).unwrap();
        assert_eq!(key.master(), &raw[..]);
    }

    #[test]
    fn garbage_session_key_is_rejected() {
        assert!(session_key(Some("***".to_string())).is_err());
    }
}
