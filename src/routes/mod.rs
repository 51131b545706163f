use actix_web::web;

pub mod app_state;
pub mod auth_routes;
pub mod chat_routes;
pub mod settings_routes;

/// Registers every page of the app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    auth_routes::init_routes(cfg);
    chat_routes::init_routes(cfg);
    settings_routes::init_routes(cfg);
}
