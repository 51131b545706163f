use actix_web::{get, post, web, Responder};
use actix_session::Session;
use crate::handlers::auth_handler::{self, LoginForm, LoginQuery};
use crate::routes::app_state::AppState;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home)
        .service(login_page)
        .service(login_submit)
        .service(logout);
}

#[get("/")]
async fn home(data: web::Data<AppState>, session: Session) -> impl Responder {
    auth_handler::home(data, session).await
}

#[get("/login")]
async fn login_page(
    data: web::Data<AppState>,
    session: Session,
    query: web::Query<LoginQuery>,
) -> impl Responder {
    auth_handler::login_page(data, session, query).await
}

#[post("/login")]
async fn login_submit(
    data: web::Data<AppState>,
    session: Session,
    form: web::Form<LoginForm>,
) -> impl Responder {
    auth_handler::login_submit(data, session, form).await
}

#[post("/logout")]
async fn logout(data: web::Data<AppState>, session: Session) -> impl Responder {
    auth_handler::logout(data, session).await
}
