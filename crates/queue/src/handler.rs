//! Message handlers and envelope routing

use std::collections::HashMap;
use std::sync::Arc;

use crate::envelope::MessageEnvelope;
use crate::{HandlerError, QueueError, QueueMessage};

/// Processes one received message. `Ok` acknowledges (deletes) it; `Err`
/// leaves it on the queue for redelivery.
#[async_trait::async_trait]
pub trait MessageHandler: Send + Sync {
    async fn handle(&self, message: &QueueMessage) -> Result<(), HandlerError>;
}

/// Processes the decoded envelope of one message type
#[async_trait::async_trait]
pub trait EnvelopeHandler: Send + Sync {
    async fn handle(&self, envelope: &MessageEnvelope) -> Result<(), HandlerError>;
}

/// Dispatches envelopes to the handler registered for their `type`
#[derive(Default, Clone)]
pub struct EnvelopeRouter {
    routes: HashMap<String, Arc<dyn EnvelopeHandler>>,
}

impl EnvelopeRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `kind`, replacing any earlier registration
    pub fn route(mut self, kind: impl Into<String>, handler: impl EnvelopeHandler + 'static) -> Self {
        self.routes.insert(kind.into(), Arc::new(handler));
        self
    }

    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for EnvelopeRouter {
    #[mutants::skip] // Debug output only
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<&str> = self.kinds().collect();
        kinds.sort_unstable();
        f.debug_struct("EnvelopeRouter").field("kinds", &kinds).finish()
    }
}

#[async_trait::async_trait]
impl MessageHandler for EnvelopeRouter {
    async fn handle(&self, message: &QueueMessage) -> Result<(), HandlerError> {
        let envelope = message.envelope()?;
        let handler = self
            .routes
            .get(&envelope.kind)
            .ok_or_else(|| QueueError::UnknownMessageType(envelope.kind.clone()))?;

        tracing::debug!(kind = %envelope.kind, message_id = ?message.message_id, "Dispatching envelope");
        handler.handle(&envelope).await
    }
}
