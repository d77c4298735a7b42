//! Poll loop shared by the query and transfer clients
//!
//! Both remote protocols expose the same shape: a job resource whose GET
//! returns a status document, polled until a terminal phase appears. The
//! loop here owns that shape; what a terminal phase *means* (result ready
//! vs. negotiation finished) is the calling client's interpretation.

use std::time::Duration;

use tokio::time::{Instant, sleep};
use tokio_util::sync::CancellationToken;
use tracing::debug;
use voflow_core::domain::job::JobHandle;
use voflow_core::uws::StatusDocument;

use crate::error::{ClientError, Result};

/// Timing knobs for a poll loop
///
/// The interval is configuration rather than a constant in the loop: it must
/// not busy-spin and must not hammer the remote service. The maximum wait
/// bounds the loop; without it a job stuck in EXECUTING would be polled
/// forever.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Delay between consecutive status fetches
    pub interval: Duration,
    /// Total time budget before the loop gives up with a timeout
    pub max_wait: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(250),
            max_wait: Duration::from_secs(600),
        }
    }
}

impl PollConfig {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }
}

/// Poll a job until it reaches a terminal phase
///
/// Each iteration fetches the status body, parses it, and records the phase
/// on the handle. The loop stops on the first terminal phase and never
/// fetches again afterwards; an ERROR or ABORTED phase is still an `Ok`
/// return, because the caller decides whether that sinks the whole pipeline.
///
/// Failure modes, each terminal for this call:
/// - a fetch error surfaces unchanged (no internal retry),
/// - an unparsable status document is [`ClientError::MalformedStatus`],
/// - `max_wait` elapsing without a terminal phase is [`ClientError::JobTimeout`],
/// - the cancellation token firing between iterations is [`ClientError::Cancelled`].
pub async fn poll_until_terminal<F, Fut>(
    handle: &mut JobHandle,
    mut fetch: F,
    config: &PollConfig,
    cancel: &CancellationToken,
) -> Result<StatusDocument>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<String>>,
{
    let started = Instant::now();

    loop {
        let body = fetch().await?;
        let doc = StatusDocument::parse(&body)?;
        handle.phase = doc.phase;
        debug!(job_id = %handle.job_id, phase = %doc.phase, "polled job status");

        if doc.phase.is_terminal() {
            return Ok(doc);
        }

        if started.elapsed() >= config.max_wait {
            return Err(ClientError::JobTimeout {
                waited: started.elapsed(),
            });
        }

        tokio::select! {
            _ = cancel.cancelled() => return Err(ClientError::Cancelled),
            _ = sleep(config.interval) => {}
        }
    }
}
