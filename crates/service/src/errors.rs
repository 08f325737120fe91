use std::fmt::Display;
use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Payload missing or not a JSON object. Raised before any mutation.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Backing file could not be written.
    #[error("persistence failure: {0}")]
    PersistenceFailure(String),
    /// Backing file exists but does not hold a JSON object. Startup only.
    #[error("corrupt backing file: {0}")]
    LoadCorruption(String),
}

impl ServiceError {
    pub fn persistence(path: &Path, err: impl Display) -> Self {
        Self::PersistenceFailure(format!("{}: {}", path.display(), err))
    }

    pub fn corruption(path: &Path, err: impl Display) -> Self {
        Self::LoadCorruption(format!("{}: {}", path.display(), err))
    }

    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}
