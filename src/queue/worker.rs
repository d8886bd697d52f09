use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use super::{EmailJob, Mailer, QueueError, RedisEmailQueue};

/// Seconds BRPOP blocks before the loop checks for shutdown again
const POP_TIMEOUT_SECS: u64 = 5;
const BACKOFF: Duration = Duration::from_secs(1);

/// Blocking read side of the email queue
#[async_trait]
pub trait JobSource: Send + Sync {
    fn name(&self) -> &str;

    /// Wait up to `timeout_secs` for the next raw payload
    async fn pop(&self, timeout_secs: u64) -> Result<Option<String>, QueueError>;
}

#[async_trait]
impl JobSource for RedisEmailQueue {
    fn name(&self) -> &str {
        self.queue_name()
    }

    async fn pop(&self, timeout_secs: u64) -> Result<Option<String>, QueueError> {
        self.pop_raw(timeout_secs).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    Delivered,
    /// Payload could not be decoded
    Discarded,
    /// Provider refused or was unreachable; the job is not retried
    Failed,
}

/// Decode and deliver one raw queue payload
pub async fn process_payload(mailer: &dyn Mailer, raw: &str) -> JobOutcome {
    let job = match EmailJob::from_json(raw) {
        Ok(job) => job,
        Err(e) => {
            warn!("Dropping malformed email job: {}", e);
            return JobOutcome::Discarded;
        }
    };

    match mailer.send_verification(&job).await {
        Ok(()) => JobOutcome::Delivered,
        Err(e) => {
            error!(email = %job.email, "Email delivery failed: {}", e);
            JobOutcome::Failed
        }
    }
}

/// Consumer loop for the verification email queue
pub struct EmailWorker {
    source: Box<dyn JobSource>,
    mailer: Arc<dyn Mailer>,
}

impl EmailWorker {
    pub fn new(source: impl JobSource + 'static, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            source: Box::new(source),
            mailer,
        }
    }

    /// Run until ctrl-c
    pub async fn run(self) {
        let stop = Arc::new(AtomicBool::new(false));
        let signal = stop.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Shutdown requested; finishing the current pop");
                signal.store(true, Ordering::SeqCst);
            }
        });

        let handled = self.run_until(&stop).await;
        info!(handled, "Email worker stopped");
    }

    /// Pop and deliver until `stop` is set. The flag is only checked between
    /// pops, so a payload already taken off the queue is always processed.
    /// Returns the number of payloads handled.
    pub async fn run_until(&self, stop: &AtomicBool) -> usize {
        info!(queue = %self.source.name(), "Email worker started");
        let mut handled = 0;

        while !stop.load(Ordering::SeqCst) {
            match self.source.pop(POP_TIMEOUT_SECS).await {
                Ok(Some(raw)) => {
                    process_payload(self.mailer.as_ref(), &raw).await;
                    handled += 1;
                }
                Ok(None) => {}
                Err(e) => {
                    error!("Queue read failed: {}", e);
                    tokio::time::sleep(BACKOFF).await;
                }
            }
        }

        handled
    }
}
