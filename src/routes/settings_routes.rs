use actix_web::{get, post, web, Responder};
use actix_session::Session;
use crate::handlers::settings_handler::{self, SettingsForm};
use crate::routes::app_state::AppState;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(settings_page)
        .service(save_settings)
        .service(test_settings);
}

#[get("/settings")]
async fn settings_page(data: web::Data<AppState>, session: Session) -> impl Responder {
    settings_handler::settings_page(data, session).await
}

#[post("/settings")]
async fn save_settings(
    data: web::Data<AppState>,
    session: Session,
    form: web::Form<SettingsForm>,
) -> impl Responder {
    settings_handler::save_settings(data, session, form).await
}

#[post("/settings/test")]
async fn test_settings(
    data: web::Data<AppState>,
    session: Session,
    form: web::Form<SettingsForm>,
) -> impl Responder {
    settings_handler::test_settings(data, session, form).await
}
