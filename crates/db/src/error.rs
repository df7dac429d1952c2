/// Failure reading or writing the pass store.
///
/// These are infrastructure faults. They are never retried at this layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Stored value could not be decoded: {0}")]
    Serialization(#[from] serde_json::Error),
}
