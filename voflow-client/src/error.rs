//! Error types for the voflow clients

use std::time::Duration;

use thiserror::Error;
use voflow_core::domain::credentials::CredentialsMissing;
use voflow_core::domain::job::JobPhase;
use voflow_core::domain::transfer::TransferDirection;
use voflow_core::uws::UwsParseError;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur while driving a remote asynchronous job
///
/// All variants are terminal for the operation that raised them; nothing is
/// retried inside the clients. Retry policy, if any, belongs to the caller,
/// which may re-submit or re-negotiate a fresh job.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP transport failed while fetching job status or the result body
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Job creation did not yield a redirect to a job resource
    ///
    /// Network errors, non-2xx responses and a missing redirect all collapse
    /// here; the distinction survives only in the attached diagnostic.
    #[error("job submission failed: {detail}")]
    SubmissionFailed { detail: String },

    /// A status document could not be understood
    #[error("malformed status document: {0}")]
    MalformedStatus(#[from] UwsParseError),

    /// No terminal phase appeared within the configured maximum wait
    #[error("job did not reach a terminal phase within {waited:?}")]
    JobTimeout { waited: Duration },

    /// The compute job finished in a phase other than COMPLETED
    #[error("query job ended in phase {phase}")]
    QueryFailed { phase: JobPhase },

    /// A transfer step (negotiation wait, push or pull) failed
    #[error("{direction} transfer failed: {detail}")]
    TransferFailed {
        direction: TransferDirection,
        detail: String,
    },

    /// Neither explicit nor stored credentials were available
    #[error(transparent)]
    CredentialsMissing(#[from] CredentialsMissing),

    /// The poll loop was abandoned via its cancellation token
    #[error("poll loop cancelled")]
    Cancelled,
}

impl ClientError {
    /// Build a submission failure with attached diagnostic
    pub fn submission(detail: impl Into<String>) -> Self {
        Self::SubmissionFailed {
            detail: detail.into(),
        }
    }

    /// Build a transfer failure for the given direction
    pub fn transfer(direction: TransferDirection, detail: impl Into<String>) -> Self {
        Self::TransferFailed {
            direction,
            detail: detail.into(),
        }
    }

    /// Whether this error means the remote job reached ERROR or ABORTED
    pub fn is_remote_failure(&self) -> bool {
        matches!(
            self,
            Self::QueryFailed { .. } | Self::TransferFailed { .. }
        )
    }

    /// Whether this error was raised before any network call was attempted
    pub fn is_local(&self) -> bool {
        matches!(self, Self::CredentialsMissing(_) | Self::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_helper_attaches_detail() {
        let err = ClientError::submission("status 500: oops");
        assert!(err.to_string().contains("status 500: oops"));
    }

    #[test]
    fn test_transfer_error_names_direction() {
        let err = ClientError::transfer(TransferDirection::Push, "connection reset");
        assert!(err.to_string().starts_with("pushToVoSpace transfer failed"));
        assert!(err.is_remote_failure());
    }

    #[test]
    fn test_credentials_missing_is_local() {
        let err = ClientError::from(CredentialsMissing);
        assert!(err.is_local());
        assert!(!err.is_remote_failure());
    }
}
