//! svckit Queue Service
//!
//! Provides queue messaging with support for:
//! - AWS SQS for production delivery
//! - Mock in-memory queue for testing and development
//! - LocalStack integration for local E2E testing
//! - Typed message envelopes routed by their `type` field
//! - A cancellable receive loop with at-least-once processing

use serde::{Deserialize, Serialize};
use svckit_common::{ApiError, BoxError, CodedError};
use thiserror::Error;

pub mod envelope;
pub mod handler;
pub mod mock;
pub mod receiver;
pub mod sqs;

pub use envelope::MessageEnvelope;
pub use handler::{EnvelopeHandler, EnvelopeRouter, MessageHandler};
pub use receiver::{receive_messages, ReceiveConfig};

#[derive(Error, Debug)]
pub enum QueueError {
    #[error("Queue configuration error: {0}")]
    Configuration(String),

    #[error("Failed to send message: {0}")]
    Send(String),

    #[error("Failed to receive messages: {0}")]
    Receive(String),

    #[error("Failed to delete message: {0}")]
    Delete(String),

    #[error("Message serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("No handler registered for message type '{0}'")]
    UnknownMessageType(String),
}

impl From<QueueError> for CodedError {
    fn from(err: QueueError) -> Self {
        CodedError::internal_server_error(err)
    }
}

impl From<QueueError> for ApiError {
    fn from(err: QueueError) -> Self {
        ApiError::Coded(err.into())
    }
}

/// Message as handed to handlers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueMessage {
    pub message_id: Option<String>,
    /// Token required to delete the message; absent messages cannot be acked
    pub receipt_handle: Option<String>,
    pub body: String,
}

impl QueueMessage {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            message_id: None,
            receipt_handle: None,
            body: body.into(),
        }
    }

    /// Parse the body as a [`MessageEnvelope`]
    pub fn envelope(&self) -> Result<MessageEnvelope, QueueError> {
        MessageEnvelope::from_body(&self.body)
    }
}

/// Queue service trait for different implementations
#[async_trait::async_trait]
pub trait QueueClient: Send + Sync {
    /// Submit a message, returning the id assigned by the queue
    async fn send_message(&self, queue_url: &str, body: &str) -> Result<String, QueueError>;

    /// Fetch up to `config.max_number_of_messages`, long-polling for
    /// `config.wait_time_seconds`
    async fn receive_messages(
        &self,
        queue_url: &str,
        config: &ReceiveConfig,
    ) -> Result<Vec<QueueMessage>, QueueError>;

    /// Acknowledge a processed message
    async fn delete_message(&self, queue_url: &str, receipt_handle: &str)
        -> Result<(), QueueError>;
}

/// Send `body` and log the outcome
pub async fn send_message(
    client: &dyn QueueClient,
    queue_url: &str,
    body: &str,
) -> Result<String, QueueError> {
    match client.send_message(queue_url, body).await {
        Ok(message_id) => {
            tracing::info!(queue_url, message_id = %message_id, "Message sent successfully");
            Ok(message_id)
        }
        Err(e) => {
            tracing::error!(queue_url, error = %e, "Failed to send message");
            Err(e)
        }
    }
}

/// Serialize `envelope` and send it
pub async fn send_envelope(
    client: &dyn QueueClient,
    queue_url: &str,
    envelope: &MessageEnvelope,
) -> Result<String, QueueError> {
    let body = envelope.to_body()?;
    send_message(client, queue_url, &body).await
}

/// Handler failures are opaque to the loop; they are only logged
pub type HandlerError = BoxError;
