use thiserror::Error;
use crate::services::StoreError;

/// Errors surfaced by a matching run
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    #[error("Record store error: {0}")]
    Store(#[from] StoreError),
}
