use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VoteError {
    #[error("Counter store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("Invalid counter value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
    #[error("Failed to render page: {0}")]
    RenderError(String),
    #[error("Unrecognized vote: {0}")]
    BadRequest(String),
}

impl VoteError {
    pub fn invalid_value(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// HTTP status the error is surfaced with.
    pub const fn status_code(&self) -> u16 {
        match self {
            VoteError::StoreUnavailable(_) => 503,
            VoteError::InvalidValue { .. } => 500,
            VoteError::RenderError(_) => 500,
            VoteError::BadRequest(_) => 400,
        }
    }

    pub const fn is_client_error(&self) -> bool {
        matches!(self, VoteError::BadRequest(_))
    }
}

pub type Result<T> = std::result::Result<T, VoteError>;
