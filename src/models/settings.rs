use actix_session::Session;
use log::warn;
use serde::{Deserialize, Serialize};

pub const BACKEND_URL_KEY: &str = "backendUrl";
pub const API_KEY_KEY: &str = "apiKey";

/// Key/value storage that lives on the client side.
pub trait SettingsStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

impl SettingsStorage for Session {
    fn get(&self, key: &str) -> Option<String> {
        match Session::get::<String>(self, key) {
            Ok(value) => value,
            Err(e) => {
                warn!("Could not read {} from session storage: {}", key, e);
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) {
        if let Err(e) = self.insert(key, value) {
            warn!("Could not write {} to session storage: {}", key, e);
        }
    }
}

/// Backend connection details entered on the settings page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(rename = "backendUrl")]
    pub backend_url: String,
    #[serde(rename = "apiKey")]
    pub api_key: String,
}

impl Settings {
    pub fn new(backend_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Settings { backend_url: backend_url.into(), api_key: api_key.into() }
    }

    pub fn read(storage: &impl SettingsStorage) -> Self {
        Settings {
            backend_url: storage.get(BACKEND_URL_KEY).unwrap_or_default(),
            api_key: storage.get(API_KEY_KEY).unwrap_or_default(),
        }
    }

    pub fn write(&self, storage: &impl SettingsStorage) {
        storage.set(BACKEND_URL_KEY, &self.backend_url);
        storage.set(API_KEY_KEY, &self.api_key);
    }

    pub fn is_configured(&self) -> bool {
        !self.backend_url.is_empty() && !self.api_key.is_empty()
    }

    /// Joins `path` onto the backend URL, ignoring a trailing slash on the URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.backend_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    pub(crate) struct MemoryStorage {
        pub(crate) values: RefCell<HashMap<String, String>>,
    }

    impl SettingsStorage for MemoryStorage {
        fn get(&self, key: &str) -> Option<String> {
            self.values.borrow().get(key).cloned()
        }

        fn set(&self, key: &str, value: &str) {
            self.values.borrow_mut().insert(key.to_string(), value.to_string());
        }
    }

    #[test]
    fn unset_storage_reads_as_empty() {
        let settings = Settings::read(&MemoryStorage::default());
        assert_eq!(settings, Settings::default());
        assert!(!settings.is_configured());
    }

    #[test]
    fn write_uses_the_fixed_keys() {
        let storage = MemoryStorage::default();
        Settings::new("http://localhost:8000", "secret").write(&storage);

        assert_eq!(storage.get("backendUrl").as_deref(), Some("http://localhost:8000"));
        assert_eq!(storage.get("apiKey").as_deref(), Some("secret"));
        assert!(Settings::read(&storage).is_configured());
    }

    #[test]
    fn one_missing_value_is_not_configured() {
        assert!(!Settings::new("http://localhost:8000", "").is_configured());
        assert!(!Settings::new("", "secret").is_configured());
    }

    #[test]
    fn endpoint_handles_trailing_slash() {
        assert_eq!(Settings::new("http://h:1/", "k").endpoint("/threads"), "http://h:1/threads");
        assert_eq!(Settings::new("http://h:1", "k").endpoint("threads/t1"), "http://h:1/threads/t1");
        assert_eq!(Settings::new("http://h:1", "k").endpoint("/"), "http://h:1/");
    }
}
