//! HTML rendering. Templates are compiled into the binary and auto-escaped.

use actix_web::HttpResponse;
use log::error;
use minijinja::Environment;
use serde::Serialize;

const TEMPLATES: &[(&str, &str)] = &[
    ("layout.html", include_str!("../../templates/layout.html")),
    ("login.html", include_str!("../../templates/login.html")),
    ("chat.html", include_str!("../../templates/chat.html")),
    ("thread.html", include_str!("../../templates/thread.html")),
    ("settings.html", include_str!("../../templates/settings.html")),
    ("partials/flashes.html", include_str!("../../templates/partials/flashes.html")),
    ("partials/sidebar.html", include_str!("../../templates/partials/sidebar.html")),
    ("partials/message_list.html", include_str!("../../templates/partials/message_list.html")),
    ("partials/chat_input.html", include_str!("../../templates/partials/chat_input.html")),
];

pub struct Views {
    env: Environment<'static>,
}

impl Views {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        for &(name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Views { env })
    }

    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<String, minijinja::Error> {
        self.env.get_template(name)?.render(ctx)
    }

    /// Renders a full page, turning template errors into a 500.
    pub fn page<S: Serialize>(&self, name: &str, ctx: S) -> HttpResponse {
        match self.render(name, ctx) {
            Ok(body) => HttpResponse::Ok()
                .content_type("text/html; charset=utf-8")
                .body(body),
            Err(e) => {
                error!("Failed to render {}: {:#}", name, e);
                HttpResponse::InternalServerError().body("Failed to render page")
            }
        }
    }
}

/// 302 to `location`, the way every page navigates.
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .append_header(("Location", location))
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;
    use crate::models::flash::Flash;
    use crate::models::message::Message;
    use crate::models::thread::ThreadSummary;

    fn thread_page(messages: Vec<Message>, phase: &str) -> String {
        Views::new().unwrap().render("thread.html", context! {
            flashes => Vec::<Flash>::new(),
            threads => vec![ThreadSummary { thread_id: "t1".to_string(), message_count: 3 }],
            current_thread_id => "t1",
            messages => messages,
            phase => phase,
            sending => phase == "sending",
        }).unwrap()
    }

    #[test]
    fn empty_thread_renders_empty_state() {
        let html = thread_page(vec![], "idle");
        assert!(html.contains("No messages yet"));
        assert!(html.contains("Start a conversation with the AI!"));
    }

    #[test]
    fn messages_render_as_escaped_bubbles() {
        let html = thread_page(
            vec![Message::user("<b>hi</b>"), Message::assistant("hello")],
            "idle",
        );
        assert!(!html.contains("No messages yet"));
        assert!(html.contains("&lt;b&gt;hi"));
        assert!(!html.contains("<b>hi"));
        assert!(html.contains("bubble-row assistant"));
        assert!(html.contains("3 messages"));
        assert!(html.contains("class=\"thread active\""));
    }

    #[test]
    fn sending_disables_the_input() {
        let html = thread_page(vec![Message::user("hi")], "sending");
        assert!(html.contains("disabled"));
        assert!(html.contains("http-equiv=\"refresh\""));
    }

    #[test]
    fn loading_shows_placeholder_instead_of_transcript() {
        let html = thread_page(vec![], "loading_history");
        assert!(html.contains("Loading chat history..."));
        assert!(!html.contains("No messages yet"));
    }

    #[test]
    fn sidebar_without_threads_shows_hint() {
        let html = Views::new().unwrap().render("chat.html", context! {
            flashes => vec![Flash::alert("Settings saved successfully!")],
            threads => Vec::<ThreadSummary>::new(),
            backend_configured => false,
        }).unwrap();
        assert!(html.contains("No chats yet. Create a new chat to get started!"));
        assert!(html.contains("Configure Settings First"));
        assert!(html.contains("role=\"alertdialog\""));
    }
}
