use async_trait::async_trait;
use sqlx::PgPool;

use super::{Account, AccountStore, DocumentId, DocumentStore, NewAccount, StoreError, generate_uid};

/// Documents live in one `documents` table keyed by collection name, body as JSONB.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn add(&self, collection: &str, document: serde_json::Value) -> Result<DocumentId, StoreError> {
        let body = serde_json::to_string(&document)?;
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO documents (collection, body) VALUES ($1, $2::jsonb) RETURNING id",
        )
        .bind(collection)
        .bind(body)
        .fetch_one(&self.pool)
        .await?;
        Ok(DocumentId(id.to_string()))
    }
}

#[derive(Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        #[derive(sqlx::FromRow)]
        struct Row {
            uid: String,
            username: String,
            password_hash: String,
        }

        let row = sqlx::query_as::<_, Row>(
            "SELECT uid, username, password_hash FROM accounts WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| Account {
            uid: r.uid,
            username: r.username,
            password_hash: r.password_hash,
        }))
    }

    async fn insert(&self, account: &NewAccount) -> Result<Account, StoreError> {
        let uid = generate_uid();
        sqlx::query("INSERT INTO accounts (uid, username, password_hash) VALUES ($1, $2, $3)")
            .bind(&uid)
            .bind(&account.username)
            .bind(&account.password_hash)
            .execute(&self.pool)
            .await?;
        Ok(Account {
            uid,
            username: account.username.clone(),
            password_hash: account.password_hash.clone(),
        })
    }
}
