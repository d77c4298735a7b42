//! Configuration module
//!
//! Handles CLI configuration including service endpoints, credentials and
//! poll timing.

use voflow_client::PollConfig;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Asynchronous TAP job endpoint
    pub tap_url: String,
    /// VOSpace store root URL
    pub vospace_url: String,
    /// VOSpace user, if given on the command line or environment
    pub user: Option<String>,
    /// VOSpace password, if given on the command line or environment
    pub password: Option<String>,
    /// Poll timing shared by all commands
    pub poll: PollConfig,
}
