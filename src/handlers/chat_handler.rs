use actix_session::Session;
use actix_web::{web, HttpResponse};
use log::{info, warn};
use minijinja::context;
use serde::Deserialize;
use crate::chat_session_manager::{lock, InFlightSend, SharedController};
use crate::handlers::auth_handler::require_user;
use crate::handlers::session_handler::{push_flash, take_flashes, viewer_id};
use crate::models::flash::Flash;
use crate::models::settings::Settings;
use crate::models::thread::is_valid_thread_id;
use crate::routes::app_state::AppState;
use crate::services::chat_service::{fetch_history, ChatPhase, SendError};
use crate::services::thread_service::load_threads;
use crate::views::redirect;

#[derive(Debug, Deserialize)]
pub struct MessageForm {
    #[serde(default)]
    pub message: String,
}

/// Welcome page shown when no thread is selected.
pub async fn chat_index(data: web::Data<AppState>, session: Session) -> HttpResponse {
    if let Err(to_login) = require_user(&data, &session).await {
        return to_login;
    }

    let settings = Settings::read(&session);
    let threads = load_threads(&settings, data.backend.as_ref()).await.unwrap_or_default();

    data.views.page("chat.html", context! {
        flashes => take_flashes(&session),
        threads => threads,
        current_thread_id => None::<String>,
        backend_configured => !settings.backend_url.is_empty(),
    })
}

/// Mints a fresh thread id and navigates to it. The backend only learns
/// about the thread when the first message is sent.
pub async fn new_chat(data: web::Data<AppState>, session: Session) -> HttpResponse {
    if let Err(to_login) = require_user(&data, &session).await {
        return to_login;
    }

    let thread_id = data.thread_ids.next_id();
    info!("Starting new chat {}", thread_id);
    redirect(&format!("/chat/{}", thread_id))
}

/// Selects `thread_id` and loads its history when the controller needs it.
/// Page loads pass `refresh` so the transcript is fetched fresh each time.
async fn load_thread(data: &AppState, controller: &SharedController, settings: &Settings, thread_id: &str, refresh: bool) {
    let ticket = {
        let mut controller = lock(controller);
        if !controller.needs_history(thread_id, refresh) {
            return;
        }
        controller.select_thread(thread_id)
    };

    let history = fetch_history(settings, data.backend.as_ref(), thread_id).await;
    lock(controller).history_loaded(ticket, history);
}

pub async fn thread_page(data: web::Data<AppState>, session: Session, thread_id: String) -> HttpResponse {
    if !is_valid_thread_id(&thread_id) {
        return HttpResponse::NotFound().body("Unknown thread");
    }
    if let Err(to_login) = require_user(&data, &session).await {
        return to_login;
    }

    let settings = Settings::read(&session);
    let threads = load_threads(&settings, data.backend.as_ref()).await.unwrap_or_default();

    let controller = data.session_manager.controller(&viewer_id(&session));
    load_thread(&data, &controller, &settings, &thread_id, true).await;

    let (messages, phase) = {
        let controller = lock(&controller);
        (controller.messages().to_vec(), controller.phase())
    };

    data.views.page("thread.html", context! {
        flashes => take_flashes(&session),
        threads => threads,
        current_thread_id => thread_id,
        messages => messages,
        phase => phase,
        sending => phase == ChatPhase::Sending,
    })
}

pub async fn send_message(
    data: web::Data<AppState>,
    session: Session,
    thread_id: String,
    form: web::Form<MessageForm>,
) -> HttpResponse {
    if !is_valid_thread_id(&thread_id) {
        return HttpResponse::NotFound().body("Unknown thread");
    }
    if let Err(to_login) = require_user(&data, &session).await {
        return to_login;
    }

    let back = format!("/chat/{}", thread_id);
    let settings = Settings::read(&session);
    let controller = data.session_manager.controller(&viewer_id(&session));
    load_thread(&data, &controller, &settings, &thread_id, false).await;

    let started = lock(&controller).begin_send(&form.message, &settings, &data.system_prompt);
    let pending = match started {
        Ok(pending) => pending,
        Err(SendError::BlankMessage) => return redirect(&back),
        Err(e @ SendError::NotConfigured) => {
            push_flash(&session, Flash::alert(e.to_string()));
            return redirect("/settings");
        }
        Err(e) => {
            warn!("Send rejected for {}: {}", thread_id, e);
            push_flash(&session, Flash::notice(e.to_string()));
            return redirect(&back);
        }
    };

    let request = pending.request.clone();
    let in_flight = InFlightSend::new(controller.clone(), pending);
    let outcome = data.backend.send_message(&settings, &request).await;
    if let Err(e) = in_flight.finish(outcome) {
        push_flash(&session, Flash::alert(e.to_string()));
    }
    redirect(&back)
}
