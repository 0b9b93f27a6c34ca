//! Long-polling receive loop
//!
//! Each batch is processed concurrently, one task per message, and fully
//! joined before the next poll. Successfully handled messages are deleted;
//! failed ones stay on the queue and come back after their visibility
//! timeout, so delivery is at-least-once.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::handler::MessageHandler;
use crate::{QueueClient, QueueMessage};

/// Receive options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiveConfig {
    /// Batch size (SQS caps this at 10)
    pub max_number_of_messages: i32,
    /// Long-poll duration of a single receive call
    pub wait_time_seconds: i32,
    /// Seconds a received message stays hidden from other consumers
    pub visibility_timeout: i32,
    /// Back-off after a failed receive
    pub poll_interval: Duration,
}

impl Default for ReceiveConfig {
    fn default() -> Self {
        Self {
            max_number_of_messages: 5,
            wait_time_seconds: 10,
            visibility_timeout: 30,
            poll_interval: Duration::from_secs(5),
        }
    }
}

/// Poll `queue_url` until `shutdown` is cancelled, handing every message
/// to `handler`.
///
/// Cancellation is observed while waiting on a receive or a back-off; a
/// batch already being processed always runs to completion.
pub async fn receive_messages<C, H>(
    client: Arc<C>,
    queue_url: String,
    config: ReceiveConfig,
    handler: Arc<H>,
    shutdown: CancellationToken,
) where
    C: QueueClient + ?Sized + 'static,
    H: MessageHandler + ?Sized + 'static,
{
    tracing::info!(queue_url = %queue_url, "Listening for messages");

    loop {
        let received = tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            result = client.receive_messages(&queue_url, &config) => result,
        };

        let messages = match received {
            Ok(messages) => messages,
            Err(e) => {
                tracing::error!(queue_url = %queue_url, error = %e, "Error receiving messages");
                tokio::select! {
                    biased;
                    _ = shutdown.cancelled() => break,
                    _ = tokio::time::sleep(config.poll_interval) => continue,
                }
            }
        };

        if messages.is_empty() {
            continue;
        }

        tracing::debug!(queue_url = %queue_url, count = messages.len(), "Received batch");

        let mut tasks = JoinSet::new();
        for message in messages {
            let client = Arc::clone(&client);
            let handler = Arc::clone(&handler);
            let queue_url = queue_url.clone();
            tasks.spawn(async move {
                process_message(client.as_ref(), &queue_url, handler.as_ref(), message).await;
            });
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                tracing::error!(queue_url = %queue_url, error = %e, "Message task panicked");
            }
        }
    }

    tracing::info!(queue_url = %queue_url, "Stopped listening for messages");
}

async fn process_message<C, H>(client: &C, queue_url: &str, handler: &H, message: QueueMessage)
where
    C: QueueClient + ?Sized,
    H: MessageHandler + ?Sized,
{
    if let Err(e) = handler.handle(&message).await {
        tracing::error!(
            queue_url,
            message_id = ?message.message_id,
            error = %e,
            "Error processing message"
        );
        return;
    }

    let Some(receipt_handle) = message.receipt_handle.as_deref() else {
        tracing::warn!(message_id = ?message.message_id, "Message has no receipt handle; cannot delete");
        return;
    };

    match client.delete_message(queue_url, receipt_handle).await {
        Ok(()) => tracing::info!(
            queue_url,
            message_id = ?message.message_id,
            "Message deleted successfully"
        ),
        Err(e) => tracing::error!(
            queue_url,
            message_id = ?message.message_id,
            error = %e,
            "Failed to delete message"
        ),
    }
}
