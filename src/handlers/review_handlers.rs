use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use actix_session::Session;
use actix_web::{HttpResponse, web};

use super::{login_redirect, pending_page, see_other};
use crate::auth::session::{SessionIdentity, set_flash};
use crate::auth::{csrf, validate};
use crate::errors::{AppError, render, render_with};
use crate::review::share_link::{FORM_PATH, render_qr_svg};
use crate::review::{
    Attachment, FormDraft, Gate, Prefill, Rating, RedirectRouter, ReviewForm, SubmitError,
};
use crate::routes::AppState;
use crate::storage::StoreError;
use crate::templates_structs::{PageContext, ReviewFormTemplate, ShareCodeResponse};

const IN_PROGRESS_MESSAGE: &str = "Your previous review is still being submitted. Please wait a moment.";

/// Multipart body of the review form.
#[derive(MultipartForm)]
pub struct ReviewUpload {
    pub csrf_token: Text<String>,
    pub location: Text<String>,
    #[multipart(rename = "shopName")]
    pub shop_name: Text<String>,
    pub text: Text<String>,
    pub rating: Text<String>,
    pub image: Option<TempFile>,
}

struct ParsedUpload {
    csrf_token: String,
    draft: FormDraft,
    errors: Vec<String>,
    image: Option<TempFile>,
}

/// Turn the text fields into a draft plus validation messages. The photo stays on disk.
fn parse_fields(upload: ReviewUpload) -> ParsedUpload {
    let rating_raw = upload.rating.into_inner();
    let location = upload.location.into_inner();
    let shop_name = upload.shop_name.into_inner();
    let text = upload.text.into_inner();

    let mut errors = vec![];
    errors.extend(validate::validate_required(&location, "Location", validate::LOCATION_MAX));
    errors.extend(validate::validate_required(&shop_name, "Shop name", validate::SHOP_NAME_MAX));
    errors.extend(validate::validate_required(&text, "Review", validate::REVIEW_TEXT_MAX));
    errors.extend(validate::validate_rating(&rating_raw));

    let rating = rating_raw
        .trim()
        .parse::<u8>()
        .ok()
        .and_then(Rating::new)
        .unwrap_or_default();

    ParsedUpload {
        csrf_token: upload.csrf_token.into_inner(),
        draft: FormDraft {
            location,
            shop_name,
            text,
            rating,
            attachment: None,
        },
        errors,
        image: upload.image,
    }
}

/// Load the uploaded photo, if one was picked.
async fn read_attachment(image: Option<TempFile>) -> Result<Option<Attachment>, AppError> {
    // An empty file input still arrives as a part with an empty file name
    let Some(file) = image.filter(|f| f.file_name.as_deref().is_some_and(|n| !n.is_empty())) else {
        return Ok(None);
    };
    let bytes = tokio::fs::read(file.file.path())
        .await
        .map_err(StoreError::from)?;
    Ok(Some(Attachment {
        file_name: file.file_name.unwrap_or_default(),
        content_type: file.content_type.map(|m| m.to_string()),
        bytes,
    }))
}

/// GET /Qr: the review form, pre-filled from `shopName` and `location`.
pub async fn form_page(
    state: web::Data<AppState>,
    session: Session,
    query: web::Query<Vec<(String, String)>>,
) -> Result<HttpResponse, AppError> {
    let prefill = Prefill::from_pairs(query.into_inner());
    let identity = SessionIdentity::new(session.clone());
    let router = RedirectRouter::new();
    let form = ReviewForm::mount(&state.reviews, &identity, &router, &prefill);

    let user = match form.gate() {
        Gate::Open(user) => user,
        Gate::Pending => return pending_page(&state.app_name),
        Gate::LoginRequired => return login_redirect(&router, &state.app_name),
    };

    let ctx = PageContext::build(&session, &user, &state.app_name);
    render(ReviewFormTemplate::new(ctx, form.draft(), form.share_link(), vec![]))
}

/// POST /Qr: upload the optional photo, then store the review.
pub async fn submit(
    state: web::Data<AppState>,
    session: Session,
    MultipartForm(upload): MultipartForm<ReviewUpload>,
) -> Result<HttpResponse, AppError> {
    let parsed = parse_fields(upload);

    let identity = SessionIdentity::new(session.clone());
    let router = RedirectRouter::new();
    let mut form = ReviewForm::with_draft(&state.reviews, &identity, &router, parsed.draft);

    let user = match form.gate() {
        Gate::Open(user) => user,
        Gate::Pending => return pending_page(&state.app_name),
        Gate::LoginRequired => return login_redirect(&router, &state.app_name),
    };
    csrf::validate_csrf(&session, &parsed.csrf_token)?;

    if !parsed.errors.is_empty() {
        let ctx = PageContext::build(&session, &user, &state.app_name);
        let tmpl = ReviewFormTemplate::new(ctx, form.draft(), form.share_link(), parsed.errors);
        return render_with(HttpResponse::BadRequest(), tmpl);
    }

    if let Some(attachment) = read_attachment(parsed.image).await? {
        form.attach(attachment);
    }

    match form.submit().await {
        Ok(_) => {
            if let Some(message) = form.notice() {
                set_flash(&session, message);
            }
            Ok(see_other(FORM_PATH))
        }
        Err(SubmitError::InProgress) => {
            let ctx = PageContext::build(&session, &user, &state.app_name);
            let tmpl = ReviewFormTemplate::new(
                ctx,
                form.draft(),
                form.share_link(),
                vec![IN_PROGRESS_MESSAGE.to_string()],
            );
            render_with(HttpResponse::Conflict(), tmpl)
        }
        Err(SubmitError::Write(_)) => {
            // Already logged; the user just gets the form back as entered
            let ctx = PageContext::build(&session, &user, &state.app_name);
            let tmpl = ReviewFormTemplate::new(ctx, form.draft(), form.share_link(), vec![]);
            render_with(HttpResponse::InternalServerError(), tmpl)
        }
    }
}

/// GET /Qr/code: share link and QR code for the values currently typed in.
pub async fn share_code(
    state: web::Data<AppState>,
    session: Session,
    query: web::Query<Vec<(String, String)>>,
) -> Result<HttpResponse, AppError> {
    let prefill = Prefill::from_pairs(query.into_inner());
    let identity = SessionIdentity::new(session);
    let router = RedirectRouter::new();
    let form = ReviewForm::mount(&state.reviews, &identity, &router, &prefill);

    if !matches!(form.gate(), Gate::Open(_)) {
        return Ok(HttpResponse::Unauthorized().finish());
    }

    let Some(link) = form.share_link() else {
        return Ok(HttpResponse::NoContent().finish());
    };
    let svg = match render_qr_svg(&link) {
        Ok(svg) => Some(svg),
        Err(e) => {
            log::warn!("Could not render QR code for {link}: {e}");
            None
        }
    };
    Ok(HttpResponse::Ok().json(ShareCodeResponse { link, svg }))
}
