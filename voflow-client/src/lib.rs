//! voflow HTTP clients
//!
//! Clients for the two asynchronous job protocols this system talks to:
//!
//! - [`TapClient`] submits an ADQL query as a UWS compute job, polls it to a
//!   terminal phase, and retrieves the result payload.
//! - [`VospaceClient`] negotiates push/pull transfer jobs against a VOSpace
//!   object store, waits for the data endpoint to become ready, and moves
//!   the bytes.
//!
//! Both share the [`poller`] primitive and the status parsing in
//! `voflow-core`. Polling is plain async work: spawn it to run a query and
//! a transfer concurrently, or hand the loop a cancellation token to abandon
//! it cleanly.
//!
//! # Example
//!
//! ```no_run
//! use tokio_util::sync::CancellationToken;
//! use voflow_client::{PollConfig, TapClient};
//! use voflow_core::domain::query::QuerySpec;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let tap = TapClient::new("http://eas.example.org/tap-dev/tap/async");
//!     let mut job = tap.submit(&QuerySpec::new("SELECT TOP 5 * FROM catalogue")).await?;
//!     let bytes = tap
//!         .await_result(&mut job, &PollConfig::default(), &CancellationToken::new())
//!         .await?;
//!     println!("got {} result bytes", bytes.len());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod poller;
mod tap;
mod vospace;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use poller::PollConfig;
pub use tap::TapClient;
pub use vospace::VospaceClient;

use voflow_core::domain::job::JobHandle;

/// Turn a followed submission redirect into a job handle
///
/// Both protocols answer a job-creation POST with a redirect to the new job
/// resource; after the HTTP client has followed it, the response's final URL
/// *is* the status URL. Landing back on the submission endpoint means no
/// redirect happened, which collapses into a submission failure along with
/// non-2xx statuses and transport errors.
pub(crate) async fn handle_submission(
    response: reqwest::Response,
    endpoint: &str,
) -> Result<JobHandle> {
    let status = response.status();
    let final_url = response.url().to_string();

    if !status.is_success() {
        let detail = response
            .text()
            .await
            .unwrap_or_else(|_| "no diagnostic body".to_string());
        return Err(ClientError::submission(format!(
            "status {status}: {detail}"
        )));
    }

    // Compare with the query string stripped; the negotiation endpoint
    // carries ?PHASE=RUN while the redirect target does not.
    let path_of = |u: &str| {
        u.split('?')
            .next()
            .unwrap_or(u)
            .trim_end_matches('/')
            .to_string()
    };
    if path_of(&final_url) == path_of(endpoint) {
        return Err(ClientError::submission(
            "response carried no redirect to a job resource",
        ));
    }

    JobHandle::from_redirect(&final_url).ok_or_else(|| {
        ClientError::submission(format!("redirect URL has no job id: {final_url}"))
    })
}
