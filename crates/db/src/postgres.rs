//! PostgreSQL-backed [`PassStore`] over the `pass_store` table.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

use crate::error::StoreError;
use crate::store::{PassStore, StoreOp};

/// Store backed by a connection pool. Batches run in one transaction.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PassStore for PgStore {
    async fn get(&self, resource: &str, key: &str) -> Result<Option<Value>, StoreError> {
        let value = sqlx::query_scalar::<_, Value>(
            "SELECT value FROM pass_store WHERE resource_name = $1 AND key = $2",
        )
        .bind(resource)
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;
        Ok(value)
    }

    async fn apply(&self, resource: &str, ops: Vec<StoreOp>) -> Result<(), StoreError> {
        if ops.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;
        for op in ops {
            match op {
                StoreOp::Put { key, value } => {
                    sqlx::query(
                        "INSERT INTO pass_store (resource_name, key, value) \
                         VALUES ($1, $2, $3) \
                         ON CONFLICT (resource_name, key) \
                         DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()",
                    )
                    .bind(resource)
                    .bind(&key)
                    .bind(&value)
                    .execute(&mut *tx)
                    .await?;
                }
                StoreOp::Delete { key } => {
                    sqlx::query("DELETE FROM pass_store WHERE resource_name = $1 AND key = $2")
                        .bind(resource)
                        .bind(&key)
                        .execute(&mut *tx)
                        .await?;
                }
            }
        }
        tx.commit().await?;
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }
}
