pub mod chat_session_manager;
pub mod config;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod views;

use actix_session::config::PersistentSession;
use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::time::Duration;
use actix_web::cookie::Key;

/// Settings and the auth token live in this cookie, so it outlives browser
/// restarts the way local storage would.
pub fn session_middleware(key: Key) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("chat_portal".to_string())
        .cookie_secure(false)
        .session_lifecycle(PersistentSession::default().session_ttl(Duration::days(365)))
        .build()
}
