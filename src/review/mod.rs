pub mod form;
pub mod locks;
pub mod navigation;
pub mod notice;
pub mod share_link;
pub mod types;

pub use form::{Gate, LOGIN_PATH, Outcome, ReviewForm, ReviewServices, SubmissionPhase, SubmitError};
pub use navigation::{RedirectRouter, Router};
pub use types::{Attachment, FormDraft, Prefill, Rating, ReviewRecord};
