use actix_web::{get, post, web, Responder};
use actix_session::Session;
use crate::handlers::chat_handler::{self, MessageForm};
use crate::routes::app_state::AppState;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(chat_index)
        .service(new_chat)
        .service(thread_page)
        .service(send_message);
}

#[get("/chat")]
async fn chat_index(data: web::Data<AppState>, session: Session) -> impl Responder {
    chat_handler::chat_index(data, session).await
}

#[post("/chat/new")]
async fn new_chat(data: web::Data<AppState>, session: Session) -> impl Responder {
    chat_handler::new_chat(data, session).await
}

#[get("/chat/{thread_id}")]
async fn thread_page(
    data: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
) -> impl Responder {
    chat_handler::thread_page(data, session, path.into_inner()).await
}

#[post("/chat/{thread_id}/messages")]
async fn send_message(
    data: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
    form: web::Form<MessageForm>,
) -> impl Responder {
    chat_handler::send_message(data, session, path.into_inner(), form).await
}
