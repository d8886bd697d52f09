//! Redis list transport for email jobs.

use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::debug;

use super::{EmailJob, EmailQueue, QueueError};

/// Producer pushes with LPUSH, the worker pops with BRPOP, so jobs are
/// delivered oldest first.
#[derive(Clone)]
pub struct RedisEmailQueue {
    client: redis::Client,
    queue_name: String,
}

impl RedisEmailQueue {
    /// Opening the client only parses the URL; no connection is made until
    /// the first command.
    pub fn new(url: &str, queue_name: &str) -> Result<Self, QueueError> {
        let client = redis::Client::open(url).map_err(|e| QueueError::Connection(e.to_string()))?;
        Ok(Self {
            client,
            queue_name: queue_name.to_string(),
        })
    }

    pub fn queue_name(&self) -> &str {
        &self.queue_name
    }

    async fn get_connection(&self) -> Result<redis::aio::MultiplexedConnection, QueueError> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| QueueError::Connection(e.to_string()))
    }

    /// Block up to `timeout_secs` for the next raw payload
    pub async fn pop_raw(&self, timeout_secs: u64) -> Result<Option<String>, QueueError> {
        let mut conn = self.get_connection().await?;
        let popped: Option<(String, String)> = redis::cmd("BRPOP")
            .arg(&self.queue_name)
            .arg(timeout_secs)
            .query_async(&mut conn)
            .await
            .map_err(|e| QueueError::Backend(e.to_string()))?;
        Ok(popped.map(|(_, payload)| payload))
    }
}

#[async_trait]
impl EmailQueue for RedisEmailQueue {
    async fn enqueue(&self, job: EmailJob) -> Result<(), QueueError> {
        let payload = job.to_json()?;
        let mut conn = self.get_connection().await?;
        conn.lpush::<_, _, ()>(&self.queue_name, payload)
            .await
            .map_err(|e| QueueError::Backend(e.to_string()))?;
        debug!(queue = %self.queue_name, email = %job.email, "Email job queued");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_url_is_a_connection_error() {
        assert!(matches!(
            RedisEmailQueue::new("not a url", "email-queue"),
            Err(QueueError::Connection(_))
        ));
    }

    #[test]
    fn opening_does_not_connect() {
        let queue = RedisEmailQueue::new("redis://127.0.0.1:1", "email-queue").unwrap();
        assert_eq!(queue.queue_name(), "email-queue");
    }
}
