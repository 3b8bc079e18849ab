//! Actor extraction from the `x-user-id` header.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use folio_core::error::CoreError;
use folio_core::types::UserId;

use crate::error::AppError;

/// Header carrying the acting user's id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Id used for requests that carry no user.
pub const GUEST: UserId = 0;

/// The user a request acts as; [`GUEST`] when the header is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewer {
    pub user_id: UserId,
}

/// An identified user, required by every write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Editor {
    pub user_id: UserId,
}

fn user_id(parts: &Parts) -> Result<Option<UserId>, AppError> {
    let Some(raw) = parts.headers.get(USER_ID_HEADER) else {
        return Ok(None);
    };
    raw.to_str()
        .ok()
        .and_then(|value| value.trim().parse::<UserId>().ok())
        .filter(|id| *id >= 0)
        .map(Some)
        .ok_or_else(|| AppError::BadRequest(format!("Invalid {USER_ID_HEADER} header")))
}

impl<S: Send + Sync> FromRequestParts<S> for Viewer {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Viewer {
            user_id: user_id(parts)?.unwrap_or(GUEST),
        })
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Editor {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match user_id(parts)? {
            Some(user_id) if user_id != GUEST => Ok(Editor { user_id }),
            _ => Err(AppError::Core(CoreError::Unauthorized(format!(
                "Missing {USER_ID_HEADER} header"
            )))),
        }
    }
}
