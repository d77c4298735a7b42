//! Query job client
//!
//! Submits an ADQL query to the archive's asynchronous TAP endpoint as a UWS
//! job and drives it to completion. The compute-job service requires no
//! credentials in this design.

use reqwest::Client;
use reqwest::header::ACCEPT;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use voflow_core::domain::job::{JobHandle, JobPhase};
use voflow_core::domain::query::QuerySpec;

use crate::error::{ClientError, Result};
use crate::poller::{PollConfig, poll_until_terminal};

/// Client for the asynchronous TAP query endpoint
#[derive(Debug, Clone)]
pub struct TapClient {
    /// Job-creation endpoint (e.g. "http://eas.example.org/tap-dev/tap/async")
    base_url: String,
    http: Client,
}

impl TapClient {
    /// Create a client for the given async job endpoint
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a client with a preconfigured HTTP client
    ///
    /// Use this to set timeouts, proxies or TLS options.
    pub fn with_client(base_url: impl Into<String>, http: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    /// Get the job-creation endpoint URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Submit a query as a new asynchronous job
    ///
    /// The response's redirect target is the job's status URL and its last
    /// path segment the job id. A transport error, a non-2xx status, or a
    /// response that never left the submission endpoint all collapse into
    /// [`ClientError::SubmissionFailed`] with the diagnostic attached.
    pub async fn submit(&self, spec: &QuerySpec) -> Result<JobHandle> {
        debug!(name = %spec.name, "submitting query job");

        let response = self
            .http
            .post(&self.base_url)
            .header(ACCEPT, "text/plain")
            .form(&spec.to_form())
            .send()
            .await
            .map_err(|e| ClientError::submission(e.to_string()))?;

        let handle = crate::handle_submission(response, &self.base_url).await?;
        info!(job_id = %handle.job_id, "query job created");
        Ok(handle)
    }

    /// Poll the job to a terminal phase and retrieve the result payload
    ///
    /// COMPLETED means the result is ready: one GET against
    /// `{status_url}/results/result` returns the raw bytes (text/csv by
    /// convention; conversion to any other tabular format is the caller's
    /// business). Any other terminal phase is [`ClientError::QueryFailed`].
    pub async fn await_result(
        &self,
        handle: &mut JobHandle,
        config: &PollConfig,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>> {
        let http = self.http.clone();
        let status_url = handle.status_url.clone();

        let doc = poll_until_terminal(
            handle,
            move || {
                let http = http.clone();
                let url = status_url.clone();
                async move {
                    let response = http.get(&url).send().await?.error_for_status()?;
                    Ok(response.text().await?)
                }
            },
            config,
            cancel,
        )
        .await?;

        match doc.phase {
            JobPhase::Completed => {
                let url = format!("{}/results/result", handle.status_url);
                debug!(job_id = %handle.job_id, "fetching query result");
                let response = self.http.get(&url).send().await?.error_for_status()?;
                let bytes = response.bytes().await?;
                info!(job_id = %handle.job_id, bytes = bytes.len(), "query result retrieved");
                Ok(bytes.to_vec())
            }
            phase => Err(ClientError::QueryFailed { phase }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn summary(phase: &str) -> String {
        format!(
            r#"<uws:job xmlns:uws="http://www.ivoa.net/xml/UWS/v1.0"><uws:jobId>jid123</uws:jobId><uws:phase>{phase}</uws:phase></uws:job>"#
        )
    }

    fn fast_poll() -> PollConfig {
        PollConfig::default()
            .with_interval(Duration::from_millis(10))
            .with_max_wait(Duration::from_secs(5))
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = TapClient::new("http://localhost:8080/tap/async/");
        assert_eq!(client.base_url(), "http://localhost:8080/tap/async");
    }

    #[tokio::test]
    async fn test_submit_follows_redirect_to_job() {
        let mut server = Server::new_async().await;
        let location = format!("{}/tap/async/jid123", server.url());
        let _submit = server
            .mock("POST", "/tap/async")
            .with_status(303)
            .with_header("Location", &location)
            .create_async()
            .await;
        let _status = server
            .mock("GET", "/tap/async/jid123")
            .with_body(summary("PENDING"))
            .create_async()
            .await;

        let client = TapClient::new(format!("{}/tap/async", server.url()));
        let handle = client.submit(&QuerySpec::new("SELECT 1")).await.unwrap();
        assert_eq!(handle.job_id, "jid123");
        assert_eq!(handle.status_url, location);
    }

    #[tokio::test]
    async fn test_submit_non_2xx_is_submission_failed() {
        let mut server = Server::new_async().await;
        let _submit = server
            .mock("POST", "/tap/async")
            .with_status(500)
            .with_body("query service down")
            .create_async()
            .await;

        let client = TapClient::new(format!("{}/tap/async", server.url()));
        let err = client.submit(&QuerySpec::new("SELECT 1")).await.unwrap_err();
        match err {
            ClientError::SubmissionFailed { detail } => {
                assert!(detail.contains("query service down"))
            }
            other => panic!("expected SubmissionFailed, got {other}"),
        }
    }

    #[tokio::test]
    async fn test_submit_without_redirect_is_submission_failed() {
        let mut server = Server::new_async().await;
        let _submit = server
            .mock("POST", "/tap/async")
            .with_status(200)
            .with_body("ok but no redirect")
            .create_async()
            .await;

        let client = TapClient::new(format!("{}/tap/async", server.url()));
        let err = client.submit(&QuerySpec::new("SELECT 1")).await.unwrap_err();
        assert!(matches!(err, ClientError::SubmissionFailed { .. }));
    }

    /// Scenario: status sequence QUEUED, EXECUTING, EXECUTING, COMPLETED.
    /// The result endpoint is hit exactly once and polling stops at COMPLETED.
    #[tokio::test]
    async fn test_await_result_happy_path() {
        let mut server = Server::new_async().await;
        let location = format!("{}/tap/async/jid123", server.url());
        let _submit = server
            .mock("POST", "/tap/async")
            .with_status(303)
            .with_header("Location", &location)
            .create_async()
            .await;

        // First hit happens while reqwest follows the submission redirect.
        let phases = ["QUEUED", "QUEUED", "EXECUTING", "EXECUTING", "COMPLETED"];
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let status = server
            .mock("GET", "/tap/async/jid123")
            .with_body_from_request(move |_| {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                summary(phases[n.min(phases.len() - 1)]).into_bytes()
            })
            .expect(5)
            .create_async()
            .await;
        let result = server
            .mock("GET", "/tap/async/jid123/results/result")
            .with_body("a,b\n1,2\n")
            .expect(1)
            .create_async()
            .await;

        let client = TapClient::new(format!("{}/tap/async", server.url()));
        let mut handle = client.submit(&QuerySpec::new("SELECT 1")).await.unwrap();
        let bytes = client
            .await_result(&mut handle, &fast_poll(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(bytes, b"a,b\n1,2\n");
        assert_eq!(handle.phase, JobPhase::Completed);
        // No status fetch after COMPLETED, result fetched exactly once.
        status.assert_async().await;
        result.assert_async().await;
    }

    #[tokio::test]
    async fn test_await_result_surfaces_error_phase() {
        let mut server = Server::new_async().await;
        let _status = server
            .mock("GET", "/tap/async/jid123")
            .with_body(summary("ERROR"))
            .create_async()
            .await;
        let result = server
            .mock("GET", "/tap/async/jid123/results/result")
            .expect(0)
            .create_async()
            .await;

        let client = TapClient::new(format!("{}/tap/async", server.url()));
        let mut handle =
            JobHandle::from_redirect(&format!("{}/tap/async/jid123", server.url())).unwrap();
        let err = client
            .await_result(&mut handle, &fast_poll(), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ClientError::QueryFailed {
                phase: JobPhase::Error
            }
        ));
        result.assert_async().await;
    }

    /// Scenario: the job never turns terminal; the loop must give up with
    /// JobTimeout instead of polling indefinitely.
    #[tokio::test]
    async fn test_await_result_times_out() {
        let mut server = Server::new_async().await;
        let _status = server
            .mock("GET", "/tap/async/jid123")
            .with_body(summary("EXECUTING"))
            .create_async()
            .await;

        let client = TapClient::new(format!("{}/tap/async", server.url()));
        let mut handle =
            JobHandle::from_redirect(&format!("{}/tap/async/jid123", server.url())).unwrap();
        let config = PollConfig::default()
            .with_interval(Duration::from_millis(20))
            .with_max_wait(Duration::from_millis(200));
        let err = client
            .await_result(&mut handle, &config, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::JobTimeout { .. }));
    }

    /// Scenario: a status document with no phase element stops the loop
    /// immediately instead of being retried or mapped to UNKNOWN.
    #[tokio::test]
    async fn test_await_result_malformed_status() {
        let mut server = Server::new_async().await;
        let status = server
            .mock("GET", "/tap/async/jid123")
            .with_body(r#"<uws:job xmlns:uws="u"><uws:jobId>jid123</uws:jobId></uws:job>"#)
            .expect(1)
            .create_async()
            .await;

        let client = TapClient::new(format!("{}/tap/async", server.url()));
        let mut handle =
            JobHandle::from_redirect(&format!("{}/tap/async/jid123", server.url())).unwrap();
        let err = client
            .await_result(&mut handle, &fast_poll(), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::MalformedStatus(_)));
        status.assert_async().await;
    }
}
