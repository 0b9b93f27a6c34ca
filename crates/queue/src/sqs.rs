//! AWS SQS Queue Client Implementation
//!
//! Production queue delivery through Amazon SQS, with support for a
//! LocalStack endpoint during local E2E testing.

use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_sqs::config::SharedCredentialsProvider;
use aws_sdk_sqs::error::DisplayErrorContext;
use aws_sdk_sqs::types::Message;
use aws_sdk_sqs::Client as SqsClient;

use crate::{QueueClient, QueueError, QueueMessage, ReceiveConfig};

/// AWS SQS queue client
#[derive(Debug, Clone)]
pub struct SqsQueueClient {
    client: SqsClient,
}

impl SqsQueueClient {
    /// Build a client for `region` from the ambient AWS configuration.
    ///
    /// With `endpoint_url` set (LocalStack) static test credentials are used.
    pub async fn new(region: &str, endpoint_url: Option<&str>) -> Self {
        let aws_config = match endpoint_url {
            Some(endpoint_url) => {
                tracing::info!(endpoint_url, "Using custom AWS endpoint");

                // For LocalStack, use dummy credentials
                let credentials = Credentials::new(
                    "test-access-key",
                    "test-secret-key",
                    None,
                    None,
                    "localstack-queue-provider",
                );

                aws_config::defaults(BehaviorVersion::latest())
                    .region(Region::new(region.to_string()))
                    .endpoint_url(endpoint_url)
                    .credentials_provider(SharedCredentialsProvider::new(credentials))
                    .load()
                    .await
            }
            None => {
                aws_config::defaults(BehaviorVersion::latest())
                    .region(Region::new(region.to_string()))
                    .load()
                    .await
            }
        };

        tracing::info!(region, "SQS client initialized");
        Self {
            client: SqsClient::new(&aws_config),
        }
    }

    /// Wrap an already configured SDK client
    pub fn from_client(client: SqsClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &SqsClient {
        &self.client
    }
}

impl From<Message> for QueueMessage {
    fn from(message: Message) -> Self {
        Self {
            message_id: message.message_id,
            receipt_handle: message.receipt_handle,
            body: message.body.unwrap_or_default(),
        }
    }
}

#[async_trait::async_trait]
impl QueueClient for SqsQueueClient {
    async fn send_message(&self, queue_url: &str, body: &str) -> Result<String, QueueError> {
        let output = self
            .client
            .send_message()
            .queue_url(queue_url)
            .message_body(body)
            .send()
            .await
            .map_err(|e| QueueError::Send(DisplayErrorContext(&e).to_string()))?;

        Ok(output.message_id.unwrap_or_default())
    }

    async fn receive_messages(
        &self,
        queue_url: &str,
        config: &ReceiveConfig,
    ) -> Result<Vec<QueueMessage>, QueueError> {
        let output = self
            .client
            .receive_message()
            .queue_url(queue_url)
            .max_number_of_messages(config.max_number_of_messages)
            .wait_time_seconds(config.wait_time_seconds)
            .visibility_timeout(config.visibility_timeout)
            .send()
            .await
            .map_err(|e| QueueError::Receive(DisplayErrorContext(&e).to_string()))?;

        Ok(output
            .messages
            .unwrap_or_default()
            .into_iter()
            .map(QueueMessage::from)
            .collect())
    }

    async fn delete_message(&self, queue_url: &str, receipt_handle: &str) -> Result<(), QueueError> {
        self.client
            .delete_message()
            .queue_url(queue_url)
            .receipt_handle(receipt_handle)
            .send()
            .await
            .map_err(|e| QueueError::Delete(DisplayErrorContext(&e).to_string()))?;
        Ok(())
    }
}
