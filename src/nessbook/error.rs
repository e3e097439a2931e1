use thiserror::Error;

#[derive(Error, Debug)]
pub enum NessbookError {
    #[error("Network failure: {0}")]
    Network(String),

    #[error("Book not found: {0}")]
    NotFound(String),

    #[error("Invalid book id: {0:?}")]
    InvalidId(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Session expired, please sign in again")]
    AuthExpired,

    #[error("Not signed in (run `nessbook login` first)")]
    NotSignedIn,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl NessbookError {
    /// True for failures the user can only fix by retrying the action.
    pub fn is_retryable(&self) -> bool {
        matches!(self, NessbookError::Network(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            NessbookError::NotFound(_) | NessbookError::InvalidId(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, NessbookError>;
