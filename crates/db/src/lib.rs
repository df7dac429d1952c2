//! Persistence for the hall pass actor.
//!
//! Everything is stored as JSON values in a key-value store partitioned by
//! resource name. [`PassStore`] abstracts the backend; [`PgStore`] is the
//! production implementation and [`MemoryStore`] backs tests and local runs.

use sqlx::postgres::PgPoolOptions;

pub mod error;
pub mod keys;
pub mod memory;
pub mod migration;
pub mod postgres;
pub mod repository;
pub mod store;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use repository::{PassStorage, PassWrite};
pub use store::{PassStore, StoreOp};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
}

/// Verify the database answers a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded schema migrations.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
