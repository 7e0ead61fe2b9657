//! Provider error types

use acloud_api::ApiError;
use thiserror::Error;

/// Provider errors
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("API error: {0}")]
    Transport(#[from] ApiError),

    #[error("Timed out waiting for desired state (last seen status: {})", .last_status.as_deref().unwrap_or("unknown"))]
    DeadlineExceeded { last_status: Option<String> },

    #[error("Operation cancelled")]
    Cancelled,

    #[error("failed to {operation} cluster {slug} in org {organisation} and env {environment}: {source}")]
    Operation {
        operation: &'static str,
        organisation: String,
        environment: String,
        slug: String,
        #[source]
        source: ApiError,
    },

    #[error("error while waiting for cluster {slug}: {source}")]
    Convergence {
        slug: String,
        #[source]
        source: Box<ProviderError>,
    },
}

impl ProviderError {
    /// Whether the error ended a poll because of the deadline
    pub fn is_deadline_exceeded(&self) -> bool {
        match self {
            ProviderError::DeadlineExceeded { .. } => true,
            ProviderError::Convergence { source, .. } => source.is_deadline_exceeded(),
            _ => false,
        }
    }

    /// Whether the error ended a poll because the caller cancelled
    pub fn is_cancelled(&self) -> bool {
        match self {
            ProviderError::Cancelled => true,
            ProviderError::Convergence { source, .. } => source.is_cancelled(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadline_message_includes_last_status() {
        let err = ProviderError::DeadlineExceeded {
            last_status: Some("starting".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Timed out waiting for desired state (last seen status: starting)"
        );
    }

    #[test]
    fn test_convergence_wraps_cancel_and_deadline() {
        let cancelled = ProviderError::Convergence {
            slug: "main".to_string(),
            source: Box::new(ProviderError::Cancelled),
        };
        assert!(cancelled.is_cancelled());
        assert!(!cancelled.is_deadline_exceeded());

        let timed_out = ProviderError::Convergence {
            slug: "main".to_string(),
            source: Box::new(ProviderError::DeadlineExceeded { last_status: None }),
        };
        assert!(timed_out.is_deadline_exceeded());
        assert!(!timed_out.is_cancelled());
    }
}
