use actix_web::{HttpResponse, ResponseError};
use askama::Template;
use std::fmt;

use crate::storage::StoreError;

#[derive(Debug)]
pub enum AppError {
    Store(StoreError),
    Template(askama::Error),
    Session(String),
    Csrf,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Store(e) => write!(f, "Store error: {e}"),
            AppError::Template(e) => write!(f, "Template error: {e}"),
            AppError::Session(e) => write!(f, "Session error: {e}"),
            AppError::Csrf => write!(f, "Invalid or missing CSRF token"),
        }
    }
}

impl std::error::Error for AppError {}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Csrf => HttpResponse::Forbidden().body(self.to_string()),
            _ => {
                log::error!("{self}");
                HttpResponse::InternalServerError().body("Internal Server Error")
            }
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Store(e)
    }
}

impl From<askama::Error> for AppError {
    fn from(e: askama::Error) -> Self {
        AppError::Template(e)
    }
}

/// Render an askama template into a 200 HTML response.
pub fn render<T: Template>(tmpl: T) -> Result<HttpResponse, AppError> {
    render_with(HttpResponse::Ok(), tmpl)
}

/// Render an askama template with a caller-chosen status.
pub fn render_with<T: Template>(
    mut builder: actix_web::HttpResponseBuilder,
    tmpl: T,
) -> Result<HttpResponse, AppError> {
    let html = tmpl.render()?;
    Ok(builder.content_type("text/html; charset=utf-8").body(html))
}
