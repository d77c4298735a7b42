//! Store credentials
//!
//! The VOSpace protocol wants basic credentials on every request. Call sites
//! may pass an explicit pair; a [`CredentialContext`] holds a process-wide
//! default used when they don't. Nothing here is ever persisted.

use thiserror::Error;

/// Raised when neither an explicit nor a stored credential pair is available
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no credentials provided and no default credentials set")]
pub struct CredentialsMissing;

/// A user/password pair for the object store
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

impl Credentials {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }
}

// Keep passwords out of logs and error chains.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Default credentials with an explicit fallback rule
///
/// `resolve` prefers an explicit pair over the stored default; with neither,
/// the caller gets [`CredentialsMissing`] before any network call is made.
#[derive(Debug, Clone, Default)]
pub struct CredentialContext {
    stored: Option<Credentials>,
}

impl CredentialContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored default wholesale
    pub fn set(&mut self, user: impl Into<String>, password: impl Into<String>) {
        self.stored = Some(Credentials::new(user, password));
    }

    /// Whether a default pair has been stored
    pub fn is_set(&self) -> bool {
        self.stored.is_some()
    }

    /// Resolve the pair to use for a call
    pub fn resolve(
        &self,
        explicit: Option<&Credentials>,
    ) -> Result<Credentials, CredentialsMissing> {
        explicit
            .or(self.stored.as_ref())
            .cloned()
            .ok_or(CredentialsMissing)
    }
}
