//! Persistence for posts and their revision chains.
//!
//! The history engine only sees the two narrow store traits in [`store`].
//! [`memory::MemoryRevisionStore`] backs tests and database-less runs;
//! [`pg::PgRevisionStore`] backs them with PostgreSQL through the repository
//! layer.

use sqlx::postgres::PgPoolOptions;

pub mod error;
pub mod memory;
pub mod models;
pub mod pg;
pub mod repositories;
pub mod store;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to verify the pool can reach the database.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
