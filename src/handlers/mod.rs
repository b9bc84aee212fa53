use actix_web::{HttpResponse, http::header};

use crate::errors::{AppError, render, render_with};
use crate::review::{LOGIN_PATH, RedirectRouter};
use crate::templates_structs::{LoginPromptTemplate, PendingTemplate};

pub mod auth_handlers;
pub mod review_handlers;

pub fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Redirect to wherever the gate navigated, with a login prompt as the body.
pub fn login_redirect(router: &RedirectRouter, app_name: &str) -> Result<HttpResponse, AppError> {
    let login_path = router
        .take_target()
        .unwrap_or_else(|| LOGIN_PATH.to_string());
    let mut builder = HttpResponse::SeeOther();
    builder.insert_header((header::LOCATION, login_path.as_str()));
    render_with(
        builder,
        LoginPromptTemplate {
            app_name: app_name.to_string(),
            login_path,
        },
    )
}

pub fn pending_page(app_name: &str) -> Result<HttpResponse, AppError> {
    render(PendingTemplate {
        app_name: app_name.to_string(),
    })
}
