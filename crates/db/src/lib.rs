//! PostgreSQL persistence for BuildLedger.
//!
//! - [`models`] -- `FromRow` rows and request DTOs.
//! - [`repositories`] -- zero-sized repositories taking `&PgPool`.
//! - [`ledger::PgBudgetLedger`] -- the transactional budget ledger store.

use sqlx::postgres::PgPoolOptions;

pub mod ledger;
pub mod models;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Verify the database answers a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
