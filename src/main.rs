use std::sync::Arc;
use actix_files::Files;
use actix_web::{middleware::Logger, web, App, HttpServer};
use chat_portal::config::{self, AppConfig};
use chat_portal::routes::{self, app_state::AppState};
use chat_portal::services::auth_service::SupabaseAuth;
use chat_portal::services::backend_client::HttpChatBackend;
use chat_portal::session_middleware;
use chat_portal::views::Views;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    config::init_logging();
    let app_config = AppConfig::from_env()?;

    let state = AppState::new(
        Arc::new(HttpChatBackend::new()?),
        Arc::new(SupabaseAuth::new(&app_config.auth_url, app_config.auth_anon_key.clone())?),
        Views::new()?,
        app_config.system_prompt.clone(),
    );
    let session_key = app_config.session_key.clone();

    log::info!("Starting server on http://{}:{}", app_config.bind_addr, app_config.port);
    HttpServer::new(move || {
        App::new()
            .wrap(session_middleware(session_key.clone()))
            // Use the Logger middleware to log incoming requests.
            .wrap(Logger::default())
            .app_data(web::Data::new(state.clone()))
            .service(Files::new("/static", "./static"))
            .configure(routes::configure)
    })
        .bind((app_config.bind_addr.as_str(), app_config.port))?
        .run()
        .await?;

    Ok(())
}
