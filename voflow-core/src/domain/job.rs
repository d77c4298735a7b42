//! Asynchronous job types
//!
//! Both remote services (the TAP query endpoint and the VOSpace transfer
//! servlet) follow the UWS job pattern: a submission yields a job resource
//! that moves through a sequence of phases until it reaches a terminal one.

use serde::{Deserialize, Serialize};

/// Lifecycle phase reported by a UWS status document
///
/// Phases not listed by the protocol version this client was written against
/// map to `Unknown`, which is treated as non-terminal so polling continues
/// when a service grows new intermediate phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JobPhase {
    Pending,
    Queued,
    Executing,
    Completed,
    Error,
    Aborted,
    Unknown,
}

impl JobPhase {
    /// Whether no further phase change is expected for this job
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Error | Self::Aborted)
    }

    /// Parse a phase from its wire spelling
    ///
    /// Unrecognized spellings become `Unknown` rather than an error; only a
    /// *missing* phase element is a malformed document (see [`crate::uws`]).
    pub fn from_wire(s: &str) -> Self {
        match s {
            "PENDING" => Self::Pending,
            "QUEUED" => Self::Queued,
            "EXECUTING" => Self::Executing,
            "COMPLETED" => Self::Completed,
            "ERROR" => Self::Error,
            "ABORTED" => Self::Aborted,
            _ => Self::Unknown,
        }
    }

    /// Wire spelling of this phase
    pub fn as_wire(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Queued => "QUEUED",
            Self::Executing => "EXECUTING",
            Self::Completed => "COMPLETED",
            Self::Error => "ERROR",
            Self::Aborted => "ABORTED",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for JobPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// Handle to a remote asynchronous job
///
/// Created from the redirect a submission response carries; the status URL
/// never changes afterwards, and `phase` is written only by the poller
/// driving this handle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobHandle {
    /// Service-assigned job identifier (last path segment of the redirect)
    pub job_id: String,
    /// URL of the job resource; GET returns the status document
    pub status_url: String,
    /// Last phase observed for this job
    pub phase: JobPhase,
}

impl JobHandle {
    /// Build a handle from the redirect URL a submission response landed on
    ///
    /// Returns `None` when the URL has no usable final path segment, which
    /// callers treat as a failed submission.
    pub fn from_redirect(url: &str) -> Option<Self> {
        let trimmed = url.trim_end_matches('/');
        let job_id = trimmed.rsplit('/').next().filter(|s| !s.is_empty())?;
        Some(Self {
            job_id: job_id.to_string(),
            status_url: trimmed.to_string(),
            phase: JobPhase::Pending,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_phases() {
        assert!(JobPhase::Completed.is_terminal());
        assert!(JobPhase::Error.is_terminal());
        assert!(JobPhase::Aborted.is_terminal());
        assert!(!JobPhase::Pending.is_terminal());
        assert!(!JobPhase::Queued.is_terminal());
        assert!(!JobPhase::Executing.is_terminal());
        assert!(!JobPhase::Unknown.is_terminal());
    }

    #[test]
    fn test_phase_wire_round_trip() {
        for phase in [
            JobPhase::Pending,
            JobPhase::Queued,
            JobPhase::Executing,
            JobPhase::Completed,
            JobPhase::Error,
            JobPhase::Aborted,
        ] {
            assert_eq!(JobPhase::from_wire(phase.as_wire()), phase);
        }
    }

    #[test]
    fn test_unrecognized_phase_maps_to_unknown() {
        assert_eq!(JobPhase::from_wire("SUSPENDED"), JobPhase::Unknown);
        assert_eq!(JobPhase::from_wire(""), JobPhase::Unknown);
        assert_eq!(JobPhase::from_wire("completed"), JobPhase::Unknown);
    }

    #[test]
    fn test_handle_from_redirect() {
        let handle =
            JobHandle::from_redirect("http://eas.example.org/tap/async/145950452462I").unwrap();
        assert_eq!(handle.job_id, "145950452462I");
        assert_eq!(
            handle.status_url,
            "http://eas.example.org/tap/async/145950452462I"
        );
        assert_eq!(handle.phase, JobPhase::Pending);
    }

    #[test]
    fn test_handle_from_redirect_trailing_slash() {
        let handle = JobHandle::from_redirect("http://host/vospace/servlet/transfers/async/42/")
            .unwrap();
        assert_eq!(handle.job_id, "42");
        assert_eq!(
            handle.status_url,
            "http://host/vospace/servlet/transfers/async/42"
        );
    }

    #[test]
    fn test_handle_from_redirect_rejects_bare_host() {
        assert!(JobHandle::from_redirect("").is_none());
        assert!(JobHandle::from_redirect("/").is_none());
    }
}
