/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Post identifier.
pub type PostId = DbId;

/// Identifier of the actor performing an operation.
pub type UserId = DbId;

/// Milliseconds since the Unix epoch (UTC). Revision timestamps use this unit.
pub type EpochMillis = i64;

/// Current wall-clock time in epoch milliseconds.
pub fn now_millis() -> EpochMillis {
    chrono::Utc::now().timestamp_millis()
}
