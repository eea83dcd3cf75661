use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Username already registered: {0}")]
    Duplicate(String),

    #[error("Unknown location id: {0}")]
    UnknownLocation(i64),

    #[error("Location not found: {0}")]
    LocationNotFound(i64),

    #[error("Stored data is inconsistent: {0}")]
    DataIntegrity(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Database error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("DB lock poisoned")]
    LockPoisoned,
}

impl StoreError {
    /// True when SQLite rejected a write because of a UNIQUE / PRIMARY KEY constraint.
    pub(crate) fn is_constraint_violation(err: &rusqlite::Error) -> bool {
        matches!(
            err,
            rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
        )
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
