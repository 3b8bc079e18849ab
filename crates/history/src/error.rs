use folio_core::error::CoreError;
use folio_db::error::StoreError;

/// Error type of every history operation.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    /// A domain-level error from `folio_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A failure reported by one of the revision stores.
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type HistoryResult<T> = Result<T, HistoryError>;
