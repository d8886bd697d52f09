//! Outbound email: a Redis list as the hand-off between the API and the
//! delivery worker.

pub mod job;
pub mod mailer;
pub mod redis;
pub mod worker;

use async_trait::async_trait;
use thiserror::Error;

pub use job::EmailJob;
pub use mailer::{Mailer, ResendMailer};
pub use self::redis::RedisEmailQueue;
pub use worker::{EmailWorker, JobSource};

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("queue connection failed: {0}")]
    Connection(String),

    #[error("queue command failed: {0}")]
    Backend(String),

    #[error("job encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Producer side of the email queue
#[async_trait]
pub trait EmailQueue: Send + Sync {
    async fn enqueue(&self, job: EmailJob) -> Result<(), QueueError>;
}
