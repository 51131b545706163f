use actix_session::Session;
use log::{error, info};
use uuid::Uuid;
use crate::models::flash::Flash;

const VIEWER_ID_KEY: &str = "viewer_id";
const ACCESS_TOKEN_KEY: &str = "access_token";
const FLASH_KEY: &str = "flash";

/// Returns the id that ties this browser to its chat controller, minting one
/// on the first visit.
pub fn viewer_id(session: &Session) -> String {
    if let Ok(Some(id)) = session.get::<String>(VIEWER_ID_KEY) {
        return id;
    }

    let id = Uuid::new_v4().to_string();
    if let Err(e) = session.insert(VIEWER_ID_KEY, &id) {
        error!("Failed to insert viewer_id into cookie: {:?}", e);
    } else {
        info!("Stored viewer_id {} in cookie", id);
    }
    id
}

pub fn access_token(session: &Session) -> Option<String> {
    session.get::<String>(ACCESS_TOKEN_KEY).ok().flatten()
}

pub fn store_access_token(session: &Session, token: &str) {
    if let Err(e) = session.insert(ACCESS_TOKEN_KEY, token) {
        error!("Failed to store access token in cookie: {:?}", e);
    }
}

pub fn clear_access_token(session: &Session) {
    session.remove(ACCESS_TOKEN_KEY);
}

/// Queues a message for the next rendered page.
pub fn push_flash(session: &Session, flash: Flash) {
    let mut pending = session.get::<Vec<Flash>>(FLASH_KEY).ok().flatten().unwrap_or_default();
    pending.push(flash);
    if let Err(e) = session.insert(FLASH_KEY, pending) {
        error!("Failed to store flash message: {:?}", e);
    }
}

pub fn take_flashes(session: &Session) -> Vec<Flash> {
    match session.remove_as::<Vec<Flash>>(FLASH_KEY) {
        Some(Ok(flashes)) => flashes,
        _ => Vec::new(),
    }
}
