use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{HttpResponse, cookie::Key, http::header, web};
use std::sync::Arc;

use crate::handlers::{auth_handlers, review_handlers};
use crate::review::ReviewServices;
use crate::review::share_link::FORM_PATH;
use crate::storage::AccountStore;

pub const SESSION_COOKIE: &str = "teastall_session";

/// Shared application state, registered once as `web::Data`.
pub struct AppState {
    pub reviews: ReviewServices,
    pub accounts: Arc<dyn AccountStore>,
    pub app_name: String,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/",
        web::get().to(|| async {
            HttpResponse::SeeOther()
                .insert_header((header::LOCATION, FORM_PATH))
                .finish()
        }),
    )
    .route("/login", web::get().to(auth_handlers::login_page))
    .route("/login", web::post().to(auth_handlers::login_submit))
    .route("/logout", web::post().to(auth_handlers::logout))
    .route("/Qr", web::get().to(review_handlers::form_page))
    .route("/Qr", web::post().to(review_handlers::submit))
    .route("/Qr/code", web::get().to(review_handlers::share_code));
}

pub fn session_middleware(key: Key, secure: bool) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name(SESSION_COOKIE.to_string())
        .cookie_secure(secure)
        .cookie_http_only(true)
        .build()
}

/// Session key from configuration, or a random one when missing or too short.
pub fn session_key(configured: Option<&str>) -> Key {
    match configured {
        Some(val) if val.len() >= 64 => {
            log::info!("Using SESSION_KEY from environment");
            Key::from(val.as_bytes())
        }
        Some(val) => {
            log::warn!("SESSION_KEY too short ({} bytes, need 64+), generating random key", val.len());
            Key::generate()
        }
        None => {
            log::warn!("No SESSION_KEY set, generating random key (sessions lost on restart)");
            Key::generate()
        }
    }
}
