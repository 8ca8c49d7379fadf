//! In-process fan-out to live subscribers.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::broadcast;

use crate::error::PublishError;

/// Capacity of each per-topic channel; slow subscribers lag past this.
const TOPIC_CAPACITY: usize = 64;

/// Trait for the live-update fan-out: publish a payload to a named topic.
#[async_trait]
pub trait LiveBroadcaster: Send + Sync {
    async fn publish(&self, topic: &str, payload: &Value) -> Result<(), PublishError>;
}

#[derive(Default)]
struct BroadcasterState {
    topics: HashMap<String, broadcast::Sender<Value>>,
    fail_on_publish: bool,
}

/// Topic-based in-process broadcaster backed by `tokio::sync::broadcast`.
///
/// Publishing to a topic with no subscribers succeeds; the payload simply
/// reaches nobody. Subscriber delivery mechanics beyond that are the
/// subscribers' concern.
#[derive(Clone, Default)]
pub struct TopicBroadcaster {
    state: Arc<RwLock<BroadcasterState>>,
}

impl TopicBroadcaster {
    /// Creates a broadcaster with no topics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to a topic, creating it if needed.
    pub fn subscribe(&self, topic: &str) -> broadcast::Receiver<Value> {
        let mut state = self.state.write().unwrap();
        state
            .topics
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(TOPIC_CAPACITY).0)
            .subscribe()
    }

    /// Configures the broadcaster to fail publishes, for retry tests.
    pub fn set_fail_on_publish(&self, fail: bool) {
        self.state.write().unwrap().fail_on_publish = fail;
    }
}

#[async_trait]
impl LiveBroadcaster for TopicBroadcaster {
    async fn publish(&self, topic: &str, payload: &Value) -> Result<(), PublishError> {
        let state = self.state.read().unwrap();

        if state.fail_on_publish {
            return Err(PublishError::Broadcast(
                "broadcast channel unavailable".to_string(),
            ));
        }

        match state.topics.get(topic) {
            // send only errors when no receiver is subscribed; that is
            // not a failure of the broadcast itself
            Some(sender) => {
                let _ = sender.send(payload.clone());
            }
            None => {
                tracing::debug!(topic, "no subscribers for topic");
            }
        }
        Ok(())
    }
}
