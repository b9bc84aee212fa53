use askama::Template;

use super::PageContext;
use crate::review::notice::NOTICE_DURATION;
use crate::review::share_link::render_qr_svg;
use crate::review::{FormDraft, Rating};

pub struct RatingOption {
    pub value: u8,
    pub label: String,
    pub selected: bool,
}

#[derive(Template)]
#[template(path = "review_form.html")]
pub struct ReviewFormTemplate {
    pub ctx: PageContext,
    pub location: String,
    pub shop_name: String,
    pub text: String,
    pub rating_options: Vec<RatingOption>,
    pub share_link: Option<String>,
    pub qr_svg: Option<String>,
    pub notice_ms: u128,
    pub errors: Vec<String>,
}

impl ReviewFormTemplate {
    pub fn new(ctx: PageContext, draft: &FormDraft, share_link: Option<String>, errors: Vec<String>) -> Self {
        let rating_options = Rating::all()
            .map(|r| RatingOption {
                value: r.value(),
                label: r.label(),
                selected: r == draft.rating,
            })
            .collect();

        let qr_svg = share_link.as_deref().and_then(|link| match render_qr_svg(link) {
            Ok(svg) => Some(svg),
            Err(e) => {
                log::warn!("Could not render QR code for {link}: {e}");
                None
            }
        });

        Self {
            ctx,
            location: draft.location.clone(),
            shop_name: draft.shop_name.clone(),
            text: draft.text.clone(),
            rating_options,
            share_link,
            qr_svg,
            notice_ms: NOTICE_DURATION.as_millis(),
            errors,
        }
    }
}
