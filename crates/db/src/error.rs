/// Failure reported by a revision store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Stored data that cannot be interpreted.
    #[error("Corrupt store data: {0}")]
    Corrupt(String),
}
