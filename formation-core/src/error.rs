use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Session expired - please login again")]
    SessionExpired,

    #[error("Request rejected with status {status}: {detail}")]
    Rejected { status: u16, detail: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User already exists: {0}")]
    DuplicateUser(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Model error: {0}")]
    Model(#[from] formation_model::ModelError),
}

impl CoreError {
    /// HTTP 401: the stored credential is no longer accepted.
    pub fn is_session_expired(&self) -> bool {
        matches!(self, CoreError::SessionExpired)
    }

    /// Failures of optional backend calls that callers replace with local
    /// data instead of surfacing.
    pub fn is_recoverable_network(&self) -> bool {
        match self {
            CoreError::Network(_) => true,
            CoreError::Rejected { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
