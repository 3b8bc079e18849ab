use crate::types::{DbId, EpochMillis, PostId};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid revision position: post {post_id} has no deletable revision at {timestamp}")]
    InvalidPosition {
        post_id: PostId,
        timestamp: EpochMillis,
    },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
