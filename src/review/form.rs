//! The review form: session gate, prefill, share link and submission pipeline.
//!
//! A `ReviewForm` lives for one mount of the page. It owns the draft and the
//! success notice; collaborators are borrowed so the same form runs inside an
//! HTTP handler or against in-memory fakes.

use chrono::Utc;
use std::fmt;
use std::sync::Arc;

use super::locks::SubmissionLocks;
use super::navigation::Router;
use super::notice::{NOTICE_DURATION, NoticeTimer, SUCCESS_MESSAGE};
use super::share_link::{encode_component, form_path, share_link};
use super::types::{Attachment, FormDraft, Prefill, Rating, ReviewRecord};
use crate::auth::session::{CurrentUser, IdentityError, IdentityProvider, SessionStatus};
use crate::storage::{BlobStore, DocumentId, DocumentStore, REVIEWS_COLLECTION, StoreError};

pub const LOGIN_PATH: &str = "/login";

/// Collaborators and settings shared by every form instance.
#[derive(Clone)]
pub struct ReviewServices {
    pub documents: Arc<dyn DocumentStore>,
    pub blobs: Arc<dyn BlobStore>,
    pub share_base: String,
    pub locks: SubmissionLocks,
}

impl ReviewServices {
    pub fn new(documents: Arc<dyn DocumentStore>, blobs: Arc<dyn BlobStore>, share_base: &str) -> Self {
        Self {
            documents,
            blobs,
            share_base: share_base.to_string(),
            locks: SubmissionLocks::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Succeeded(DocumentId),
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionPhase {
    Idle,
    Uploading,
    Writing,
    Done(Outcome),
}

impl SubmissionPhase {
    pub fn is_busy(&self) -> bool {
        matches!(self, SubmissionPhase::Uploading | SubmissionPhase::Writing)
    }
}

/// Result of the session gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate {
    Pending,
    LoginRequired,
    Open(CurrentUser),
}

#[derive(Debug)]
pub enum SubmitError {
    /// The same user already has a submission uploading or writing.
    InProgress,
    Write(StoreError),
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::InProgress => write!(f, "a submission is already in progress"),
            SubmitError::Write(e) => write!(f, "review write failed: {e}"),
        }
    }
}

impl std::error::Error for SubmitError {}

pub struct ReviewForm<'a> {
    services: &'a ReviewServices,
    identity: &'a dyn IdentityProvider,
    router: &'a dyn Router,
    draft: FormDraft,
    phase: SubmissionPhase,
    notice: Option<NoticeTimer>,
}

impl<'a> ReviewForm<'a> {
    /// Mount the form, seeding shop name and location from navigation parameters.
    pub fn mount(
        services: &'a ReviewServices,
        identity: &'a dyn IdentityProvider,
        router: &'a dyn Router,
        prefill: &Prefill,
    ) -> Self {
        Self::with_draft(services, identity, router, FormDraft::from_prefill(prefill))
    }

    pub fn with_draft(
        services: &'a ReviewServices,
        identity: &'a dyn IdentityProvider,
        router: &'a dyn Router,
        draft: FormDraft,
    ) -> Self {
        Self {
            services,
            identity,
            router,
            draft,
            phase: SubmissionPhase::Idle,
            notice: None,
        }
    }

    /// Resolve the session. Signed-out visitors are sent to the login view.
    pub fn gate(&self) -> Gate {
        match self.identity.status() {
            SessionStatus::Loading => Gate::Pending,
            SessionStatus::SignedOut => {
                self.router.navigate(&self.login_path());
                Gate::LoginRequired
            }
            SessionStatus::SignedIn(user) => Gate::Open(user),
        }
    }

    /// Login path, carrying the pre-filled form as `next` when there is one.
    fn login_path(&self) -> String {
        if self.draft.shop_name.is_empty() && self.draft.location.is_empty() {
            return LOGIN_PATH.to_string();
        }
        let back = form_path(&self.draft.shop_name, &self.draft.location);
        format!("{LOGIN_PATH}?next={}", encode_component(&back))
    }

    pub fn draft(&self) -> &FormDraft {
        &self.draft
    }

    pub fn phase(&self) -> &SubmissionPhase {
        &self.phase
    }

    pub fn set_location(&mut self, location: impl Into<String>) {
        self.draft.location = location.into();
    }

    pub fn set_shop_name(&mut self, shop_name: impl Into<String>) {
        self.draft.shop_name = shop_name.into();
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.draft.text = text.into();
    }

    pub fn set_rating(&mut self, rating: Rating) {
        self.draft.rating = rating;
    }

    pub fn attach(&mut self, attachment: Attachment) {
        self.draft.attachment = Some(attachment);
    }

    pub fn clear_attachment(&mut self) {
        self.draft.attachment = None;
    }

    /// Link for the live shop name and location.
    pub fn share_link(&self) -> Option<String> {
        share_link(&self.services.share_base, &self.draft.shop_name, &self.draft.location)
    }

    /// The success notice, while its window is open.
    pub fn notice(&self) -> Option<&'static str> {
        self.notice
            .as_ref()
            .filter(|n| n.is_visible())
            .map(NoticeTimer::message)
    }

    /// Upload the attachment (if any), then append the review document.
    ///
    /// Upload failures degrade to a record without an image. On a write
    /// failure the draft is left exactly as it was.
    pub async fn submit(&mut self) -> Result<DocumentId, SubmitError> {
        let user_id = self.identity.status().user().map(|u| u.uid.clone());
        let owner = user_id.clone().unwrap_or_default();
        let _guard = self
            .services
            .locks
            .try_acquire(&owner)
            .ok_or(SubmitError::InProgress)?;
        self.notice = None;

        let image_url = match &self.draft.attachment {
            Some(attachment) => {
                self.phase = SubmissionPhase::Uploading;
                upload_image(self.services.blobs.as_ref(), attachment).await
            }
            None => None,
        };

        self.phase = SubmissionPhase::Writing;
        let record = ReviewRecord::from_draft(&self.draft, image_url, Utc::now(), user_id);
        let written = match serde_json::to_value(&record) {
            Ok(document) => self.services.documents.add(REVIEWS_COLLECTION, document).await,
            Err(e) => Err(StoreError::from(e)),
        };

        match written {
            Ok(id) => {
                log::info!("Review written with id {id}");
                self.draft = FormDraft::default();
                self.phase = SubmissionPhase::Done(Outcome::Succeeded(id.clone()));
                self.notice = Some(NoticeTimer::show(SUCCESS_MESSAGE, NOTICE_DURATION));
                Ok(id)
            }
            Err(e) => {
                log::error!("Error adding review: {e}");
                self.phase = SubmissionPhase::Done(Outcome::Failed);
                Err(SubmitError::Write(e))
            }
        }
    }

    /// Sign out, then go to the login view whether or not sign-out worked.
    pub async fn logout(&self) -> Result<(), IdentityError> {
        let result = self.identity.sign_out().await;
        if let Err(e) = &result {
            log::error!("Sign-out failed: {e}");
        }
        self.router.navigate(LOGIN_PATH);
        result
    }
}

/// Blob key for an uploaded file: its final path component under `images/`.
pub fn image_key(file_name: &str) -> Option<String> {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or("").trim();
    if base.is_empty() || base == "." || base == ".." {
        return None;
    }
    Some(format!("images/{base}"))
}

async fn upload_image(blobs: &dyn BlobStore, attachment: &Attachment) -> Option<String> {
    let Some(key) = image_key(&attachment.file_name) else {
        log::warn!("Unusable image file name '{}', skipping upload", attachment.file_name);
        return None;
    };
    match store_image(blobs, &key, attachment).await {
        Ok(url) => Some(url),
        Err(e) => {
            log::warn!("Error uploading image {key}: {e}");
            None
        }
    }
}

async fn store_image(blobs: &dyn BlobStore, key: &str, attachment: &Attachment) -> Result<String, StoreError> {
    blobs
        .put(key, &attachment.bytes, attachment.content_type.as_deref())
        .await?;
    blobs.public_url(key).await
}
