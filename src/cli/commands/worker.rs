use std::sync::Arc;

use anyhow::Context;

use crate::config::AppConfig;
use crate::queue::{EmailWorker, RedisEmailQueue, ResendMailer};

pub async fn handle(config: &AppConfig) -> anyhow::Result<()> {
    let queue = RedisEmailQueue::new(&config.mail.redis_url, &config.mail.queue_name)
        .context("failed to open the email queue")?;
    let mailer = ResendMailer::from_config(&config.mail).context("mail delivery is not configured")?;

    EmailWorker::new(queue, Arc::new(mailer)).run().await;
    Ok(())
}
