//! Mock Queue Client Implementation
//!
//! In-memory queues for tests and local development. Receives long-poll
//! like SQS: an empty queue waits up to `wait_time_seconds` for a send.
//! Received messages stay in flight until deleted or requeued.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::Notify;

use crate::{QueueClient, QueueError, QueueMessage, ReceiveConfig};

#[derive(Debug, Default)]
struct MockQueue {
    available: VecDeque<QueueMessage>,
    in_flight: HashMap<String, QueueMessage>,
    sent: Vec<String>,
    deleted: Vec<QueueMessage>,
}

#[derive(Debug, Default)]
struct MockState {
    queues: HashMap<String, MockQueue>,
    next_id: u64,
    fail_sends: bool,
    failing_receives: usize,
    receive_calls: usize,
}

impl MockState {
    fn take_batch(&mut self, queue_url: &str, max: i32) -> Vec<QueueMessage> {
        let Some(queue) = self.queues.get_mut(queue_url) else {
            return Vec::new();
        };

        let count = usize::try_from(max).unwrap_or(0).min(queue.available.len());
        let batch: Vec<QueueMessage> = queue.available.drain(..count).collect();
        for message in &batch {
            if let Some(receipt) = &message.receipt_handle {
                queue.in_flight.insert(receipt.clone(), message.clone());
            }
        }
        batch
    }
}

/// Mock queue client for testing
#[derive(Debug, Clone, Default)]
pub struct MockQueueClient {
    state: Arc<Mutex<MockState>>,
    arrivals: Arc<Notify>,
}

impl MockQueueClient {
    /// Create a new mock queue client
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn bodies(&self, queue_url: &str, pick: impl Fn(&MockQueue) -> Vec<String>) -> Vec<String> {
        self.lock().queues.get(queue_url).map(pick).unwrap_or_default()
    }

    /// Make every send fail until turned off
    pub fn fail_sends(&self, fail: bool) {
        self.lock().fail_sends = fail;
    }

    /// Make the next `count` receive calls fail
    pub fn fail_next_receives(&self, count: usize) {
        self.lock().failing_receives = count;
    }

    /// Number of receive calls made so far
    pub fn receive_calls(&self) -> usize {
        self.lock().receive_calls
    }

    /// Bodies of every message sent, in order
    pub fn sent_bodies(&self, queue_url: &str) -> Vec<String> {
        self.bodies(queue_url, |q| q.sent.clone())
    }

    /// Bodies of acknowledged messages, in deletion order
    pub fn deleted_bodies(&self, queue_url: &str) -> Vec<String> {
        self.bodies(queue_url, |q| q.deleted.iter().map(|m| m.body.clone()).collect())
    }

    /// Bodies of received but not yet deleted messages
    pub fn in_flight_bodies(&self, queue_url: &str) -> Vec<String> {
        self.bodies(queue_url, |q| {
            let mut bodies: Vec<String> = q.in_flight.values().map(|m| m.body.clone()).collect();
            bodies.sort();
            bodies
        })
    }

    /// Number of messages waiting to be received
    pub fn available_count(&self, queue_url: &str) -> usize {
        self.lock()
            .queues
            .get(queue_url)
            .map_or(0, |q| q.available.len())
    }

    /// Return in-flight messages to the queue, as an expired visibility
    /// timeout would
    pub fn requeue_in_flight(&self, queue_url: &str) {
        {
            let mut state = self.lock();
            let Some(queue) = state.queues.get_mut(queue_url) else {
                return;
            };
            let returned: Vec<QueueMessage> = queue.in_flight.drain().map(|(_, m)| m).collect();
            queue.available.extend(returned);
        }
        self.arrivals.notify_one();
    }

    fn start_receive(
        &self,
        queue_url: &str,
        config: &ReceiveConfig,
    ) -> Result<Vec<QueueMessage>, QueueError> {
        let mut state = self.lock();
        state.receive_calls += 1;
        if state.failing_receives > 0 {
            state.failing_receives -= 1;
            return Err(QueueError::Receive("injected receive failure".to_string()));
        }
        Ok(state.take_batch(queue_url, config.max_number_of_messages))
    }
}

#[async_trait::async_trait]
impl QueueClient for MockQueueClient {
    async fn send_message(&self, queue_url: &str, body: &str) -> Result<String, QueueError> {
        let message_id = {
            let mut state = self.lock();
            if state.fail_sends {
                return Err(QueueError::Send("injected send failure".to_string()));
            }

            state.next_id += 1;
            let id = state.next_id;
            let message = QueueMessage {
                message_id: Some(format!("mock-msg-{id}")),
                receipt_handle: Some(format!("mock-receipt-{id}")),
                body: body.to_string(),
            };

            let queue = state.queues.entry(queue_url.to_string()).or_default();
            queue.sent.push(body.to_string());
            queue.available.push_back(message);
            format!("mock-msg-{id}")
        };

        self.arrivals.notify_one();
        tracing::debug!(queue_url, message_id = %message_id, "Mock message queued");
        Ok(message_id)
    }

    async fn receive_messages(
        &self,
        queue_url: &str,
        config: &ReceiveConfig,
    ) -> Result<Vec<QueueMessage>, QueueError> {
        let batch = self.start_receive(queue_url, config)?;
        let wait = Duration::from_secs(u64::try_from(config.wait_time_seconds).unwrap_or(0));
        if !batch.is_empty() || wait.is_zero() {
            return Ok(batch);
        }

        let _ = tokio::time::timeout(wait, self.arrivals.notified()).await;

        Ok(self
            .lock()
            .take_batch(queue_url, config.max_number_of_messages))
    }

    async fn delete_message(&self, queue_url: &str, receipt_handle: &str) -> Result<(), QueueError> {
        let mut state = self.lock();
        let queue = state
            .queues
            .get_mut(queue_url)
            .ok_or_else(|| QueueError::Delete(format!("unknown queue {queue_url}")))?;

        let message = queue
            .in_flight
            .remove(receipt_handle)
            .ok_or_else(|| QueueError::Delete(format!("unknown receipt handle {receipt_handle}")))?;
        queue.deleted.push(message);
        Ok(())
    }
}
