use thiserror::Error;

pub type Result<T> = std::result::Result<T, RegistryError>;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Invalid host URL: {0}")]
    InvalidUrl(String),

    #[error("Host '{0}' not found")]
    HostNotFound(String),

    #[error("Storage operation '{operation}' failed on path '{path}': {source}")]
    Storage {
        operation: String,
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Reasons a reachability check can fail.
///
/// Callers that only need a yes/no answer can treat both variants alike;
/// [`ValidationError::reason`] keeps the two distinguishable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Host '{url}' did not answer within {timeout_ms}ms")]
    Timeout { url: String, timeout_ms: u64 },

    #[error("Host '{url}' is not a valid server: {detail}")]
    Rejected { url: String, detail: String },
}

impl ValidationError {
    pub const TIMEOUT: &'static str = "timeout";
    pub const INVALID: &'static str = "invalid";

    /// Stable reason string reported to the caller of a validation.
    pub fn reason(&self) -> &'static str {
        match self {
            ValidationError::Timeout { .. } => Self::TIMEOUT,
            ValidationError::Rejected { .. } => Self::INVALID,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ValidationError::Timeout { .. })
    }
}

/// Recoverable problems met while loading persisted state.
///
/// These never escape [`crate::migrate::load`]; they are logged and the
/// migration falls through to its next step.
#[derive(Error, Debug)]
pub enum MigrationIssue {
    #[error("Persisted host data is malformed: {0}")]
    MalformedPersistedData(String),

    #[error("Import file '{path}' is invalid: {reason}")]
    ImportFileInvalid {
        path: std::path::PathBuf,
        reason: String,
    },
}
