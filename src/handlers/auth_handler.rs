use actix_session::Session;
use actix_web::{web, HttpResponse};
use log::{error, info, warn};
use minijinja::context;
use serde::Deserialize;
use crate::handlers::session_handler::{
    access_token, clear_access_token, push_flash, store_access_token, take_flashes, viewer_id,
};
use crate::models::flash::Flash;
use crate::models::user::{SignUpOutcome, User};
use crate::routes::app_state::AppState;
use crate::views::redirect;

pub const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub mode: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub mode: Option<String>,
}

fn is_sign_up(mode: Option<&str>) -> bool {
    mode == Some("sign_up")
}

/// Asks the auth provider who owns the session's token. Any failure counts
/// as "nobody".
pub async fn current_user(data: &AppState, session: &Session) -> Option<User> {
    let token = access_token(session)?;
    match data.auth.get_user(&token).await {
        Ok(Some(user)) => Some(user),
        Ok(None) => {
            clear_access_token(session);
            None
        }
        Err(e) => {
            error!("Could not verify user: {}", e);
            None
        }
    }
}

/// Gate for protected pages: the user, or a redirect to the login page.
pub async fn require_user(data: &AppState, session: &Session) -> Result<User, HttpResponse> {
    match current_user(data, session).await {
        Some(user) => Ok(user),
        None => {
            info!("No signed-in user; redirecting to /login");
            Err(redirect("/login"))
        }
    }
}

pub async fn home(data: web::Data<AppState>, session: Session) -> HttpResponse {
    match current_user(&data, &session).await {
        Some(_) => redirect("/chat"),
        None => redirect("/login"),
    }
}

fn render_login(data: &AppState, session: &Session, sign_up: bool, email: &str, error: Option<String>) -> HttpResponse {
    data.views.page("login.html", context! {
        flashes => take_flashes(session),
        sign_up => sign_up,
        email => email,
        error => error,
        min_password_length => MIN_PASSWORD_LENGTH,
    })
}

pub async fn login_page(data: web::Data<AppState>, session: Session, query: web::Query<LoginQuery>) -> HttpResponse {
    render_login(&data, &session, is_sign_up(query.mode.as_deref()), "", None)
}

pub async fn login_submit(data: web::Data<AppState>, session: Session, form: web::Form<LoginForm>) -> HttpResponse {
    let form = form.into_inner();
    let sign_up = is_sign_up(form.mode.as_deref());
    let email = form.email.trim();

    if form.password.chars().count() < MIN_PASSWORD_LENGTH {
        let message = format!("Password should be at least {} characters.", MIN_PASSWORD_LENGTH);
        return render_login(&data, &session, sign_up, email, Some(message));
    }

    if sign_up {
        match data.auth.sign_up(email, &form.password).await {
            Ok(SignUpOutcome::SignedIn(token)) => {
                store_access_token(&session, &token);
                redirect("/chat")
            }
            Ok(SignUpOutcome::ConfirmationRequired) => {
                info!("Sign-up for {} awaits email confirmation", email);
                push_flash(&session, Flash::alert("Check your email for the confirmation link!"));
                render_login(&data, &session, true, email, None)
            }
            Err(e) => {
                warn!("Sign-up failed for {}: {}", email, e);
                render_login(&data, &session, true, email, Some(e.to_string()))
            }
        }
    } else {
        match data.auth.sign_in(email, &form.password).await {
            Ok(auth_session) => {
                store_access_token(&session, &auth_session.access_token);
                redirect("/chat")
            }
            Err(e) => {
                warn!("Sign-in failed for {}: {}", email, e);
                render_login(&data, &session, false, email, Some(e.to_string()))
            }
        }
    }
}

/// Ends the auth session. Saved backend settings stay in the cookie.
pub async fn logout(data: web::Data<AppState>, session: Session) -> HttpResponse {
    if let Some(token) = access_token(&session) {
        if let Err(e) = data.auth.sign_out(&token).await {
            warn!("Sign-out with auth provider failed: {}", e);
        }
    }
    clear_access_token(&session);
    data.session_manager.remove(&viewer_id(&session));
    redirect("/login")
}
