//! Error taxonomy shared by the scheduler, streak tracker and challenge lifecycle.

/// Errors surfaced to callers of the service layer.
#[derive(Debug)]
pub enum StudyError {
    /// Caller contract violation: bad enum text, non-finite accuracy, negative counts.
    InvalidArgument(String),
    /// Challenge completion on a missing or already completed challenge.
    AlreadyCompletedOrNotFound(i64),
    Database(rusqlite::Error),
}

impl std::fmt::Display for StudyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StudyError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            StudyError::AlreadyCompletedOrNotFound(id) => {
                write!(f, "Challenge {} not found or already completed", id)
            }
            StudyError::Database(e) => write!(f, "Database error: {}", e),
        }
    }
}

impl StudyError {
    /// Returns a user-facing error message without exposing database internals.
    pub fn user_message(&self) -> &str {
        match self {
            StudyError::InvalidArgument(_) => "Invalid request",
            StudyError::AlreadyCompletedOrNotFound(_) => "Challenge not found or already completed",
            StudyError::Database(_) => "Database unavailable",
        }
    }
}

impl std::error::Error for StudyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StudyError::Database(e) => Some(e),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for StudyError {
    fn from(e: rusqlite::Error) -> Self {
        StudyError::Database(e)
    }
}

pub type Result<T> = std::result::Result<T, StudyError>;
