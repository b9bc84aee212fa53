// Template context structures for Askama templates, organized by page.

use actix_session::Session;

use crate::auth::csrf;
use crate::auth::session::{CurrentUser, take_flash};

/// Common context shared by all signed-in pages.
/// Templates access these as `ctx.username`, `ctx.csrf_token`, etc.
pub struct PageContext {
    pub username: String,
    pub avatar_initial: String,
    pub flash: Option<String>,
    pub app_name: String,
    pub csrf_token: String,
}

impl PageContext {
    pub fn build(session: &Session, user: &CurrentUser, app_name: &str) -> Self {
        let flash = take_flash(session);
        let csrf_token = csrf::get_or_create_token(session);
        let avatar_initial = user
            .username
            .chars()
            .next()
            .unwrap_or('?')
            .to_uppercase()
            .to_string();
        Self {
            username: user.username.clone(),
            avatar_initial,
            flash,
            app_name: app_name.to_string(),
            csrf_token,
        }
    }
}

mod api;
mod common;
mod review;

pub use self::api::ShareCodeResponse;
pub use self::common::{LoginPromptTemplate, LoginTemplate, PendingTemplate};
pub use self::review::{RatingOption, ReviewFormTemplate};
