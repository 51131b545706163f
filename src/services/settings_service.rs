use log::{info, warn};
use serde::Serialize;
use crate::models::settings::Settings;
use crate::services::backend_client::{BackendError, ChatBackend};

/// Outcome of the settings page's "Test Connection" button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionTest {
    pub success: bool,
    pub message: String,
    /// Pretty-printed body returned by the backend.
    pub data: Option<String>,
}

/// Probes the backend root with the values currently typed into the form.
pub async fn test_connection(settings: &Settings, backend: &dyn ChatBackend) -> ConnectionTest {
    info!("Testing connection to {}", settings.backend_url);
    match backend.probe(settings).await {
        Ok(body) => ConnectionTest {
            success: true,
            message: "Connection successful!".to_string(),
            data: serde_json::to_string_pretty(&body).ok(),
        },
        Err(BackendError::Status { status, reason }) => {
            warn!("Connection test got {} {}", status, reason);
            ConnectionTest {
                success: false,
                message: format!("Connection failed: {} {}", status, reason),
                data: None,
            }
        }
        Err(e) => {
            warn!("Connection test failed: {}", e);
            ConnectionTest {
                success: false,
                message: format!("Connection error: {}", e),
                data: None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::backend_client::MockChatBackend;
    use serde_json::json;

    fn typed() -> Settings {
        Settings::new("http://localhost:8000", "secret")
    }

    #[tokio::test]
    async fn success_echoes_the_body() {
        let mut backend = MockChatBackend::new();
        backend.expect_probe().returning(|_| Ok(json!({"status": "ok"})));

        let result = test_connection(&typed(), &backend).await;
        assert!(result.success);
        assert_eq!(result.message, "Connection successful!");
        assert_eq!(result.data.as_deref(), Some("{\n  \"status\": \"ok\"\n}"));
    }

    #[tokio::test]
    async fn status_failure_reports_code_and_reason() {
        let mut backend = MockChatBackend::new();
        backend.expect_probe()
            .returning(|_| Err(BackendError::Status { status: 401, reason: "Unauthorized".to_string() }));

        let result = test_connection(&typed(), &backend).await;
        assert!(!result.success);
        assert_eq!(result.message, "Connection failed: 401 Unauthorized");
        assert!(result.data.is_none());
    }

    #[tokio::test]
    async fn decode_failure_is_a_connection_error() {
        let mut backend = MockChatBackend::new();
        backend.expect_probe()
            .returning(|_| Err(BackendError::Decode("expected value".to_string())));

        let result = test_connection(&typed(), &backend).await;
        assert!(!result.success);
        assert!(result.message.starts_with("Connection error: "));
    }
}
