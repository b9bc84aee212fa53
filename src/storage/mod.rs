//! Backend collaborators: document store, blob store and account store.
//!
//! The review form only talks to these traits, so the HTTP app runs on
//! PostgreSQL and the local filesystem while tests swap in in-memory fakes.

use async_trait::async_trait;
use std::fmt;

pub mod blob_fs;
pub mod postgres;

/// Collection every review document is appended to.
pub const REVIEWS_COLLECTION: &str = "reviews";

#[derive(Debug)]
pub enum StoreError {
    Db(sqlx::Error),
    Io(std::io::Error),
    Serialize(serde_json::Error),
    InvalidKey(String),
    Unavailable(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Db(e) => write!(f, "database error: {e}"),
            StoreError::Io(e) => write!(f, "io error: {e}"),
            StoreError::Serialize(e) => write!(f, "serialization error: {e}"),
            StoreError::InvalidKey(key) => write!(f, "invalid blob key '{key}'"),
            StoreError::Unavailable(msg) => write!(f, "store unavailable: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Db(e)
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialize(e)
    }
}

/// Identifier generated by the document store for a new document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentId(pub String);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Append a new document to the named collection.
    async fn add(&self, collection: &str, document: serde_json::Value) -> Result<DocumentId, StoreError>;
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store bytes at `key`, replacing whatever was there.
    async fn put(&self, key: &str, bytes: &[u8], content_type: Option<&str>) -> Result<(), StoreError>;

    /// Resolve a publicly fetchable URL for a stored key.
    async fn public_url(&self, key: &str) -> Result<String, StoreError>;
}

/// Login account, including the password hash.
#[derive(Debug, Clone)]
pub struct Account {
    pub uid: String,
    pub username: String,
    pub password_hash: String,
}

pub struct NewAccount {
    pub username: String,
    pub password_hash: String,
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError>;

    async fn insert(&self, account: &NewAccount) -> Result<Account, StoreError>;
}

/// Random 128-bit hex identifier for new accounts.
pub fn generate_uid() -> String {
    let bytes: [u8; 16] = rand::random();
    hex::encode(bytes)
}
