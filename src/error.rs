//! Error types for profile lookups.

use reqwest::StatusCode;
use thiserror::Error;

/// Why a lookup did not produce a profile.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("handle is empty")]
    EmptyHandle,

    #[error("GitHub user `{0}` not found")]
    NotFound(String),

    #[error("GitHub API error ({0})")]
    Status(StatusCode),

    #[error("request to GitHub failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid API base URL `{0}`")]
    InvalidBaseUrl(String),
}

/// Coarse classification of a [`LookupError`].
///
/// Everything that is not an empty handle or a 404 is reported the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    EmptyHandle,
    NotFound,
    TransportOrServer,
}

impl LookupError {
    pub fn kind(&self) -> FailureKind {
        match self {
            LookupError::EmptyHandle => FailureKind::EmptyHandle,
            LookupError::NotFound(_) => FailureKind::NotFound,
            LookupError::Status(_)
            | LookupError::Transport(_)
            | LookupError::InvalidBaseUrl(_) => FailureKind::TransportOrServer,
        }
    }
}
