//! Transfer job client
//!
//! Drives the VOSpace asynchronous transfer-negotiation protocol: POST a
//! transfer descriptor, poll the resulting job, then move the bytes against
//! the negotiated data endpoint. Every request against the store carries
//! basic credentials, resolved through a [`CredentialContext`] before any
//! network call is attempted.

use std::path::Path;

use reqwest::Client;
use reqwest::multipart::{Form, Part};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use voflow_core::domain::credentials::{CredentialContext, Credentials};
use voflow_core::domain::job::{JobHandle, JobPhase};
use voflow_core::domain::payload::Payload;
use voflow_core::domain::transfer::{TransferDirection, TransferSpec};

use crate::error::{ClientError, Result};
use crate::poller::{PollConfig, poll_until_terminal};

/// File name given to the descriptor part of the negotiation request
const DESCRIPTOR_NAME: &str = "transfer.xml";

/// Client for a VOSpace object store
#[derive(Debug, Clone)]
pub struct VospaceClient {
    /// Store root URL (e.g. "https://vospace.example.org/vospace")
    base_url: String,
    http: Client,
    credentials: CredentialContext,
}

impl VospaceClient {
    /// Create a client for the given store root URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a client with a preconfigured HTTP client
    pub fn with_client(base_url: impl Into<String>, http: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            credentials: CredentialContext::new(),
        }
    }

    /// Get the store root URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Store default credentials used when a call passes none
    pub fn set_credentials(&mut self, user: impl Into<String>, password: impl Into<String>) {
        self.credentials.set(user, password);
    }

    fn negotiation_url(&self) -> String {
        format!("{}/servlet/transfers/async?PHASE=RUN", self.base_url)
    }

    fn data_url(&self, user: &str, job_id: &str) -> String {
        format!("{}/service/data/{}/{}", self.base_url, user, job_id)
    }

    /// Negotiate a new transfer job
    ///
    /// Posts the transfer descriptor as a multipart document; the redirect
    /// the service answers with points at the negotiation job, exactly as a
    /// query submission does. Fails with [`ClientError::CredentialsMissing`]
    /// before any network I/O when no credentials resolve.
    pub async fn negotiate(
        &self,
        spec: &TransferSpec,
        creds: Option<&Credentials>,
    ) -> Result<JobHandle> {
        let creds = self.credentials.resolve(creds)?;
        let descriptor = spec.to_descriptor(&creds.user);
        debug!(direction = %spec.direction, folder = %spec.folder, "negotiating transfer");

        let form = Form::new().part("file", Part::text(descriptor).file_name(DESCRIPTOR_NAME));
        let endpoint = self.negotiation_url();
        let response = self
            .http
            .post(&endpoint)
            .basic_auth(&creds.user, Some(&creds.password))
            .multipart(form)
            .send()
            .await
            .map_err(|e| ClientError::submission(e.to_string()))?;

        let handle = crate::handle_submission(response, &endpoint).await?;
        info!(job_id = %handle.job_id, direction = %spec.direction, "transfer job created");
        Ok(handle)
    }

    /// Poll the negotiation job until the data endpoint is ready
    ///
    /// The protocol reuses COMPLETED to mean "negotiation finished", not
    /// "data transferred" — the actual push or pull still follows. Returns
    /// the job id the data endpoint is keyed by, taken from the final status
    /// document when present (the document wins over the redirect-derived id
    /// because it is what the service last said).
    ///
    /// An ERROR or ABORTED phase is [`ClientError::TransferFailed`] for this
    /// transfer's direction.
    pub async fn await_active(
        &self,
        handle: &mut JobHandle,
        direction: TransferDirection,
        creds: Option<&Credentials>,
        config: &PollConfig,
        cancel: &CancellationToken,
    ) -> Result<String> {
        let creds = self.credentials.resolve(creds)?;
        let http = self.http.clone();
        let status_url = handle.status_url.clone();

        let doc = poll_until_terminal(
            handle,
            move || {
                let http = http.clone();
                let url = status_url.clone();
                let creds = creds.clone();
                async move {
                    let response = http
                        .get(&url)
                        .basic_auth(&creds.user, Some(&creds.password))
                        .send()
                        .await?
                        .error_for_status()?;
                    Ok(response.text().await?)
                }
            },
            config,
            cancel,
        )
        .await?;

        match doc.phase {
            JobPhase::Completed => Ok(doc.job_id.unwrap_or_else(|| handle.job_id.clone())),
            phase => Err(ClientError::transfer(
                direction,
                format!("negotiation ended in phase {phase}"),
            )),
        }
    }

    /// Stream payload bytes to the negotiated data endpoint
    ///
    /// `file_name` is the remote file name recorded by the store. Transport
    /// failures and non-2xx responses are [`ClientError::TransferFailed`]
    /// with direction Push.
    pub async fn push(
        &self,
        job_id: &str,
        file_name: &str,
        payload: Payload,
        creds: Option<&Credentials>,
    ) -> Result<()> {
        let creds = self.credentials.resolve(creds)?;
        let bytes = payload.into_bytes().await.map_err(|e| {
            ClientError::transfer(TransferDirection::Push, format!("reading payload: {e}"))
        })?;

        let url = self.data_url(&creds.user, job_id);
        debug!(%url, bytes = bytes.len(), "pushing payload");
        let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name.to_string()));
        let response = self
            .http
            .post(&url)
            .basic_auth(&creds.user, Some(&creds.password))
            .multipart(form)
            .send()
            .await
            .map_err(|e| ClientError::transfer(TransferDirection::Push, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .text()
                .await
                .unwrap_or_else(|_| "no diagnostic body".to_string());
            return Err(ClientError::transfer(
                TransferDirection::Push,
                format!("status {status}: {detail}"),
            ));
        }
        info!(job_id = %job_id, "payload accepted by data endpoint");
        Ok(())
    }

    /// Retrieve the object bytes from the negotiated data endpoint
    pub async fn pull(&self, job_id: &str, creds: Option<&Credentials>) -> Result<Vec<u8>> {
        let creds = self.credentials.resolve(creds)?;
        let url = self.data_url(&creds.user, job_id);
        debug!(%url, "pulling payload");
        let response = self
            .http
            .get(&url)
            .basic_auth(&creds.user, Some(&creds.password))
            .send()
            .await
            .map_err(|e| ClientError::transfer(TransferDirection::Pull, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .text()
                .await
                .unwrap_or_else(|_| "no diagnostic body".to_string());
            return Err(ClientError::transfer(
                TransferDirection::Pull,
                format!("status {status}: {detail}"),
            ));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::transfer(TransferDirection::Pull, e.to_string()))?;
        info!(job_id = %job_id, bytes = bytes.len(), "payload retrieved from data endpoint");
        Ok(bytes.to_vec())
    }

    /// Delete the finished negotiation job from the remote queue
    ///
    /// Failures here are downgraded to a warning: the transfer itself has
    /// already succeeded or failed, and remote resource leakage is not this
    /// client's to guarantee against.
    pub async fn cleanup(&self, handle: &JobHandle, creds: Option<&Credentials>) {
        let creds = match self.credentials.resolve(creds) {
            Ok(creds) => creds,
            Err(e) => {
                warn!(job_id = %handle.job_id, "skipping transfer job cleanup: {e}");
                return;
            }
        };

        match self
            .http
            .delete(&handle.status_url)
            .basic_auth(&creds.user, Some(&creds.password))
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => {
                debug!(job_id = %handle.job_id, "transfer job deleted");
            }
            Ok(response) => {
                warn!(
                    job_id = %handle.job_id,
                    status = %response.status(),
                    "transfer job cleanup refused"
                );
            }
            Err(e) => {
                warn!(job_id = %handle.job_id, "transfer job cleanup failed: {e}");
            }
        }
    }

    // =============================================================================
    // High-level transfers
    // =============================================================================

    /// Negotiate, wait, push, then clean up
    pub async fn store(
        &self,
        folder: &str,
        file: &str,
        payload: Payload,
        creds: Option<&Credentials>,
        config: &PollConfig,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let spec = TransferSpec::push(folder, file);
        let mut handle = self.negotiate(&spec, creds).await?;
        let endpoint_job = self
            .await_active(&mut handle, spec.direction, creds, config, cancel)
            .await?;
        self.push(&endpoint_job, &spec.file, payload, creds).await?;
        self.cleanup(&handle, creds).await;
        Ok(())
    }

    /// Negotiate, wait, pull, then clean up
    pub async fn retrieve(
        &self,
        folder: &str,
        file: &str,
        creds: Option<&Credentials>,
        config: &PollConfig,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>> {
        let spec = TransferSpec::pull(folder, file);
        let mut handle = self.negotiate(&spec, creds).await?;
        let endpoint_job = self
            .await_active(&mut handle, spec.direction, creds, config, cancel)
            .await?;
        let bytes = self.pull(&endpoint_job, creds).await?;
        self.cleanup(&handle, creds).await;
        Ok(bytes)
    }

    /// Store the contents of a local file
    pub async fn store_file(
        &self,
        folder: &str,
        file: &str,
        local_path: &Path,
        creds: Option<&Credentials>,
        config: &PollConfig,
        cancel: &CancellationToken,
    ) -> Result<()> {
        self.store(
            folder,
            file,
            Payload::File(local_path.to_path_buf()),
            creds,
            config,
            cancel,
        )
        .await
    }

    /// Retrieve a remote object into a local file
    pub async fn retrieve_to_file(
        &self,
        folder: &str,
        file: &str,
        local_path: &Path,
        creds: Option<&Credentials>,
        config: &PollConfig,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let bytes = self.retrieve(folder, file, creds, config, cancel).await?;
        tokio::fs::write(local_path, bytes).await.map_err(|e| {
            ClientError::transfer(
                TransferDirection::Pull,
                format!("writing {}: {e}", local_path.display()),
            )
        })
    }
}
