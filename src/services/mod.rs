pub mod auth_service;
pub mod backend_client;
pub mod chat_service;
pub mod settings_service;
pub mod thread_service;
