pub mod auth_handler;
pub mod chat_handler;
pub mod session_handler;
pub mod settings_handler;
