//! Event publisher contract and in-memory broker.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::error::PublishError;

/// Trait for the durable message-queue producer.
///
/// `publish` errors synchronously per attempt; retry is the caller's
/// concern (see [`crate::retry::send_with_retry`]).
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publishes a payload to `exchange` under `routing_key`.
    async fn publish(
        &self,
        exchange: &str,
        routing_key: &str,
        payload: &Value,
    ) -> Result<(), PublishError>;
}

#[derive(Default)]
struct BrokerState {
    /// (exchange, routing key) -> queue names bound to that pair.
    bindings: HashMap<(String, String), Vec<String>>,
    queues: HashMap<String, mpsc::UnboundedSender<Value>>,
    published: u64,
    fail_on_publish: bool,
}

/// In-memory broker modeling a direct exchange with queue bindings.
///
/// Stands in for the real AMQP broker in tests and default server wiring.
/// Messages published to a bound (exchange, routing key) pair are buffered
/// on the queue's channel until a consumer drains them; unroutable
/// messages are dropped with a warning, matching direct-exchange
/// semantics.
#[derive(Clone, Default)]
pub struct InMemoryBroker {
    state: Arc<RwLock<BrokerState>>,
}

impl InMemoryBroker {
    /// Creates a new broker with no queues or bindings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a queue, binds it to `(exchange, routing_key)`, and
    /// returns the consumer end.
    ///
    /// Re-declaring an existing queue replaces its consumer.
    pub fn bind(
        &self,
        exchange: &str,
        routing_key: &str,
        queue: &str,
    ) -> mpsc::UnboundedReceiver<Value> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut state = self.state.write().unwrap();
        state.queues.insert(queue.to_string(), tx);
        let bound = state
            .bindings
            .entry((exchange.to_string(), routing_key.to_string()))
            .or_default();
        if !bound.iter().any(|q| q == queue) {
            bound.push(queue.to_string());
        }
        rx
    }

    /// Configures the broker to reject publishes, for retry tests.
    pub fn set_fail_on_publish(&self, fail: bool) {
        self.state.write().unwrap().fail_on_publish = fail;
    }

    /// Returns the number of successfully published messages.
    pub fn published_count(&self) -> u64 {
        self.state.read().unwrap().published
    }
}

#[async_trait]
impl EventPublisher for InMemoryBroker {
    async fn publish(
        &self,
        exchange: &str,
        routing_key: &str,
        payload: &Value,
    ) -> Result<(), PublishError> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_publish {
            return Err(PublishError::Broker("broker unavailable".to_string()));
        }

        let key = (exchange.to_string(), routing_key.to_string());
        let queues = state.bindings.get(&key).cloned().unwrap_or_default();
        if queues.is_empty() {
            tracing::warn!(exchange, routing_key, "no queue bound, message dropped");
        }
        for queue in &queues {
            if let Some(tx) = state.queues.get(queue)
                && tx.send(payload.clone()).is_err()
            {
                tracing::warn!(queue, "consumer gone, message dropped");
            }
        }

        state.published += 1;
        Ok(())
    }
}
