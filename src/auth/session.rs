use actix_session::Session;
use async_trait::async_trait;
use std::fmt;

use crate::storage::Account;

const UID_KEY: &str = "uid";
const USERNAME_KEY: &str = "username";
const FLASH_KEY: &str = "flash";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub uid: String,
    pub username: String,
}

/// What the identity collaborator knows about the visitor right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    /// Not resolved yet; callers must neither show the form nor redirect.
    Loading,
    SignedOut,
    SignedIn(CurrentUser),
}

impl SessionStatus {
    pub fn user(&self) -> Option<&CurrentUser> {
        match self {
            SessionStatus::SignedIn(user) => Some(user),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum IdentityError {
    Session(String),
}

impl fmt::Display for IdentityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityError::Session(e) => write!(f, "Session error: {e}"),
        }
    }
}

impl std::error::Error for IdentityError {}

/// Identity collaborator: current-user-or-none plus sign-out.
#[async_trait(?Send)]
pub trait IdentityProvider {
    fn status(&self) -> SessionStatus;

    async fn sign_out(&self) -> Result<(), IdentityError>;
}

/// Identity backed by the encrypted cookie session.
#[derive(Clone)]
pub struct SessionIdentity {
    session: Session,
}

impl SessionIdentity {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    /// Bind the account to a fresh session id.
    pub fn sign_in(&self, account: &Account) -> Result<(), IdentityError> {
        self.session.renew();
        self.session
            .insert(UID_KEY, &account.uid)
            .map_err(|e| IdentityError::Session(e.to_string()))?;
        self.session
            .insert(USERNAME_KEY, &account.username)
            .map_err(|e| IdentityError::Session(e.to_string()))?;
        Ok(())
    }
}

#[async_trait(?Send)]
impl IdentityProvider for SessionIdentity {
    /// A cookie that fails to decrypt never gets here: the session middleware
    /// drops it and hands over an empty session, which reads as `SignedOut`.
    /// `Loading` is a decrypted session whose identity values do not parse.
    fn status(&self) -> SessionStatus {
        let uid = self.session.get::<String>(UID_KEY);
        let username = self.session.get::<String>(USERNAME_KEY);
        match (uid, username) {
            (Err(e), _) | (_, Err(e)) => {
                log::warn!("Unreadable session state: {e}");
                SessionStatus::Loading
            }
            (Ok(Some(uid)), Ok(Some(username))) => {
                SessionStatus::SignedIn(CurrentUser { uid, username })
            }
            _ => SessionStatus::SignedOut,
        }
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        self.session.purge();
        Ok(())
    }
}

pub fn set_flash(session: &Session, message: &str) {
    if let Err(e) = session.insert(FLASH_KEY, message) {
        log::warn!("Could not store flash message: {e}");
    }
}

pub fn take_flash(session: &Session) -> Option<String> {
    let flash = session.get::<String>(FLASH_KEY).unwrap_or(None);
    if flash.is_some() {
        session.remove(FLASH_KEY);
    }
    flash
}
