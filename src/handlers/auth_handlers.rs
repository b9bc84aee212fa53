use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

use super::see_other;
use crate::auth::session::{IdentityProvider, SessionIdentity};
use crate::auth::validate::safe_next;
use crate::auth::{csrf, password};
use crate::errors::{AppError, render};
use crate::review::share_link::FORM_PATH;
use crate::review::{FormDraft, LOGIN_PATH, RedirectRouter, ReviewForm};
use crate::routes::AppState;
use crate::templates_structs::LoginTemplate;

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub csrf_token: String,
    #[serde(default)]
    pub next: String,
}

#[derive(Deserialize)]
pub struct LoginQuery {
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Deserialize)]
pub struct CsrfOnly {
    pub csrf_token: String,
}

pub async fn login_page(
    state: web::Data<AppState>,
    session: Session,
    query: web::Query<LoginQuery>,
) -> Result<HttpResponse, AppError> {
    let next = query
        .next
        .as_deref()
        .and_then(safe_next)
        .unwrap_or(FORM_PATH)
        .to_string();

    // Already signed in: straight on to the destination
    if SessionIdentity::new(session.clone()).status().user().is_some() {
        return Ok(see_other(&next));
    }

    let csrf_token = csrf::get_or_create_token(&session);
    render(LoginTemplate {
        error: None,
        app_name: state.app_name.clone(),
        csrf_token,
        next,
    })
}

pub async fn login_submit(
    state: web::Data<AppState>,
    session: Session,
    form: web::Form<LoginForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let next = safe_next(&form.next).unwrap_or(FORM_PATH).to_string();
    let username = form.username.trim();

    let verified = match state.accounts.find_by_username(username).await? {
        Some(account) => match password::verify_password(&form.password, &account.password_hash) {
            Ok(true) => Some(account),
            Ok(false) => None,
            Err(e) => {
                log::error!("Unreadable password hash for '{}': {e}", account.username);
                None
            }
        },
        None => {
            password::verify_unknown_user(&form.password);
            None
        }
    };

    match verified {
        Some(account) => {
            SessionIdentity::new(session.clone())
                .sign_in(&account)
                .map_err(|e| AppError::Session(e.to_string()))?;
            log::info!("User '{}' signed in", account.username);
            Ok(see_other(&next))
        }
        None => {
            log::info!("Failed sign-in for '{}'", username);
            let csrf_token = csrf::get_or_create_token(&session);
            render(LoginTemplate {
                error: Some("Invalid username or password".to_string()),
                app_name: state.app_name.clone(),
                csrf_token,
                next,
            })
        }
    }
}

/// Sign out and go to the login page. A failed sign-out is logged, never shown.
pub async fn logout(
    state: web::Data<AppState>,
    session: Session,
    body: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &body.csrf_token)?;

    let identity = SessionIdentity::new(session);
    let router = RedirectRouter::new();
    let form = ReviewForm::with_draft(&state.reviews, &identity, &router, FormDraft::default());
    let _ = form.logout().await;

    let target = router
        .take_target()
        .unwrap_or_else(|| LOGIN_PATH.to_string());
    Ok(see_other(&target))
}
