//! Shared test infrastructure.
//!
//! In-memory stand-ins for every collaborator of the review form, plus
//! helpers for driving the HTTP app (CSRF extraction, session cookies,
//! multipart bodies).

#![allow(dead_code)]

use async_trait::async_trait;
use regex::Regex;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use teastall::auth::password;
use teastall::auth::session::{CurrentUser, IdentityError, IdentityProvider, SessionStatus};
use teastall::review::{Attachment, ReviewRecord, ReviewServices, Router};
use teastall::storage::{
    Account, AccountStore, BlobStore, DocumentId, DocumentStore, NewAccount, REVIEWS_COLLECTION,
    StoreError, generate_uid,
};

// ============================================================================
// TEST CONSTANTS
// ============================================================================

pub const SHARE_BASE: &str = "https://teastallbd.netlify.app";
pub const BLOB_BASE: &str = "https://blobs.test";
pub const TEST_UID: &str = "uid-rahim";
pub const TEST_USERNAME: &str = "rahim";
pub const TEST_PASSWORD: &str = "cha-khabo-123";

// ============================================================================
// DOCUMENT STORE
// ============================================================================

#[derive(Default)]
pub struct MemoryDocumentStore {
    documents: Mutex<Vec<(String, serde_json::Value)>>,
    failing: AtomicBool,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        self.documents.lock().unwrap().len()
    }

    pub fn reviews(&self) -> Vec<ReviewRecord> {
        self.documents
            .lock()
            .unwrap()
            .iter()
            .filter(|(collection, _)| collection == REVIEWS_COLLECTION)
            .map(|(_, doc)| serde_json::from_value(doc.clone()).expect("stored review parses"))
            .collect()
    }

    pub fn raw(&self, index: usize) -> serde_json::Value {
        self.documents.lock().unwrap()[index].1.clone()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn add(&self, collection: &str, document: serde_json::Value) -> Result<DocumentId, StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("document store offline".to_string()));
        }
        let mut documents = self.documents.lock().unwrap();
        documents.push((collection.to_string(), document));
        Ok(DocumentId(format!("doc-{}", documents.len())))
    }
}

// ============================================================================
// BLOB STORE
// ============================================================================

#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
    fail_put: AtomicBool,
    fail_url: AtomicBool,
    /// When set, `put` waits for a permit before storing anything.
    hold: Option<Arc<Notify>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn held(hold: Arc<Notify>) -> Self {
        Self {
            hold: Some(hold),
            ..Self::default()
        }
    }

    pub fn set_fail_put(&self, failing: bool) {
        self.fail_put.store(failing, Ordering::SeqCst);
    }

    pub fn set_fail_url(&self, failing: bool) {
        self.fail_url.store(failing, Ordering::SeqCst);
    }

    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.blobs.lock().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, key: &str, bytes: &[u8], _content_type: Option<&str>) -> Result<(), StoreError> {
        if let Some(hold) = &self.hold {
            hold.notified().await;
        }
        if self.fail_put.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("blob store rejected write".to_string()));
        }
        self.blobs.lock().unwrap().insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    async fn public_url(&self, key: &str) -> Result<String, StoreError> {
        if self.fail_url.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("url resolution failed".to_string()));
        }
        if !self.blobs.lock().unwrap().contains_key(key) {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(format!("{BLOB_BASE}/{key}"))
    }
}

// ============================================================================
// ACCOUNTS
// ============================================================================

#[derive(Default)]
pub struct MemoryAccountStore {
    accounts: Mutex<Vec<Account>>,
}

impl MemoryAccountStore {
    /// Store holding one account with a real argon2 hash.
    pub fn with_user(username: &str, plain_password: &str) -> Self {
        let store = Self::default();
        let password_hash = password::hash_password(plain_password).expect("hash");
        store.accounts.lock().unwrap().push(Account {
            uid: TEST_UID.to_string(),
            username: username.to_string(),
            password_hash,
        });
        store
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.username == username)
            .cloned())
    }

    async fn insert(&self, account: &NewAccount) -> Result<Account, StoreError> {
        let created = Account {
            uid: generate_uid(),
            username: account.username.clone(),
            password_hash: account.password_hash.clone(),
        };
        self.accounts.lock().unwrap().push(created.clone());
        Ok(created)
    }
}

// ============================================================================
// IDENTITY AND ROUTING
// ============================================================================

pub struct FakeIdentity {
    status: RefCell<SessionStatus>,
    sign_out_fails: bool,
    sign_out_calls: Cell<usize>,
}

impl FakeIdentity {
    fn with_status(status: SessionStatus) -> Self {
        Self {
            status: RefCell::new(status),
            sign_out_fails: false,
            sign_out_calls: Cell::new(0),
        }
    }

    pub fn signed_in() -> Self {
        Self::with_status(SessionStatus::SignedIn(CurrentUser {
            uid: TEST_UID.to_string(),
            username: TEST_USERNAME.to_string(),
        }))
    }

    pub fn signed_out() -> Self {
        Self::with_status(SessionStatus::SignedOut)
    }

    pub fn loading() -> Self {
        Self::with_status(SessionStatus::Loading)
    }

    pub fn failing_sign_out(mut self) -> Self {
        self.sign_out_fails = true;
        self
    }

    pub fn sign_out_calls(&self) -> usize {
        self.sign_out_calls.get()
    }
}

#[async_trait(?Send)]
impl IdentityProvider for FakeIdentity {
    fn status(&self) -> SessionStatus {
        self.status.borrow().clone()
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        self.sign_out_calls.set(self.sign_out_calls.get() + 1);
        if self.sign_out_fails {
            return Err(IdentityError::Session("identity service unreachable".to_string()));
        }
        *self.status.borrow_mut() = SessionStatus::SignedOut;
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingRouter {
    paths: RefCell<Vec<String>>,
}

impl RecordingRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paths(&self) -> Vec<String> {
        self.paths.borrow().clone()
    }
}

impl Router for RecordingRouter {
    fn navigate(&self, path: &str) {
        self.paths.borrow_mut().push(path.to_string());
    }
}

// ============================================================================
// SERVICES
// ============================================================================

pub fn services(documents: &Arc<MemoryDocumentStore>, blobs: &Arc<MemoryBlobStore>) -> ReviewServices {
    ReviewServices::new(documents.clone(), blobs.clone(), SHARE_BASE)
}

pub fn photo(file_name: &str) -> Attachment {
    Attachment {
        file_name: file_name.to_string(),
        content_type: Some("image/jpeg".to_string()),
        bytes: vec![0xFF, 0xD8, 0xFF, 0xE0],
    }
}

// ============================================================================
// HTTP HELPERS
// ============================================================================

pub const BOUNDARY: &str = "teastall-test-boundary";

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={BOUNDARY}")
}

/// Build a multipart/form-data body with text fields and an optional `image` file.
pub fn multipart_body(fields: &[(&str, &str)], image: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    if let Some((file_name, bytes)) = image {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"image\"; filename=\"{file_name}\"\r\n\
                 Content-Type: image/jpeg\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn extract_csrf_token(html: &str) -> String {
    // <input type="hidden" name="csrf_token" value="...">
    let re = Regex::new(r#"name="csrf_token"\s+value="([^"]+)""#).expect("Failed to compile regex");
    re.captures(html)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
        .expect("CSRF token not found in HTML")
}
