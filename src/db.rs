use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::auth::password;
use crate::storage::{AccountStore, NewAccount, StoreError, postgres::PgAccountStore};

pub async fn init_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(8)
        .connect(database_url)
        .await
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    log::info!("Database migrations complete");
    Ok(())
}

/// Create the initial account if no account with that username exists yet.
pub async fn seed_admin(pool: &PgPool, username: &str, plain_password: &str) -> Result<(), StoreError> {
    let accounts = PgAccountStore::new(pool.clone());
    if accounts.find_by_username(username).await?.is_some() {
        log::info!("Account '{}' already present, skipping seed", username);
        return Ok(());
    }

    let password_hash = password::hash_password(plain_password)
        .map_err(|e| StoreError::Unavailable(e.to_string()))?;
    let account = accounts
        .insert(&NewAccount {
            username: username.to_string(),
            password_hash,
        })
        .await?;
    log::info!("Seeded account '{}' ({})", account.username, account.uid);
    Ok(())
}
