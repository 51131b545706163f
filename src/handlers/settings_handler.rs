use actix_session::Session;
use actix_web::{web, HttpResponse};
use log::info;
use minijinja::context;
use serde::Deserialize;
use crate::handlers::auth_handler::require_user;
use crate::handlers::session_handler::{push_flash, take_flashes};
use crate::models::flash::Flash;
use crate::models::settings::Settings;
use crate::routes::app_state::AppState;
use crate::services::settings_service::{test_connection, ConnectionTest};

#[derive(Debug, Deserialize)]
pub struct SettingsForm {
    #[serde(default)]
    pub backend_url: String,
    #[serde(default)]
    pub api_key: String,
}

impl SettingsForm {
    fn settings(&self) -> Settings {
        Settings::new(self.backend_url.trim(), self.api_key.trim())
    }
}

const BOTH_REQUIRED: &str = "Enter both a backend URL and an API key.";

fn render_settings(data: &AppState, session: &Session, settings: &Settings, test_result: Option<ConnectionTest>) -> HttpResponse {
    data.views.page("settings.html", context! {
        flashes => take_flashes(session),
        backend_url => settings.backend_url,
        api_key => settings.api_key,
        test_result => test_result,
    })
}

pub async fn settings_page(data: web::Data<AppState>, session: Session) -> HttpResponse {
    if let Err(to_login) = require_user(&data, &session).await {
        return to_login;
    }
    let settings = Settings::read(&session);
    render_settings(&data, &session, &settings, None)
}

pub async fn save_settings(data: web::Data<AppState>, session: Session, form: web::Form<SettingsForm>) -> HttpResponse {
    if let Err(to_login) = require_user(&data, &session).await {
        return to_login;
    }

    let settings = form.settings();
    if !settings.is_configured() {
        push_flash(&session, Flash::notice(BOTH_REQUIRED));
        return render_settings(&data, &session, &settings, None);
    }

    settings.write(&session);
    info!("Saved backend settings for {}", settings.backend_url);
    push_flash(&session, Flash::alert("Settings saved successfully!"));
    render_settings(&data, &session, &settings, None)
}

/// Tests the values currently in the form; nothing is saved.
pub async fn test_settings(data: web::Data<AppState>, session: Session, form: web::Form<SettingsForm>) -> HttpResponse {
    if let Err(to_login) = require_user(&data, &session).await {
        return to_login;
    }

    let settings = form.settings();
    if !settings.is_configured() {
        push_flash(&session, Flash::notice(BOTH_REQUIRED));
        return render_settings(&data, &session, &settings, None);
    }

    let result = test_connection(&settings, data.backend.as_ref()).await;
    render_settings(&data, &session, &settings, Some(result))
}
