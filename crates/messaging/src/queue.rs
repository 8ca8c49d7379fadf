//! Bounded background queue for detached event publication.

use std::sync::Arc;

use domain::TableReservedEvent;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::publisher::EventPublisher;
use crate::retry::{RetryPolicy, send_with_retry};
use crate::topology::{TABLE_EVENTS_EXCHANGE, TABLE_RESERVED_KEY};

/// Default queue depth before enqueues start dropping.
const DEFAULT_CAPACITY: usize = 256;

/// Hands events from the request path to a single worker task that
/// publishes them with retry.
///
/// The channel is bounded: when the worker falls behind by more than the
/// capacity, further events are dropped with a warning instead of piling
/// up unbounded tasks. Publication outcomes never reach the request path.
#[derive(Clone)]
pub struct PublishQueue {
    tx: mpsc::Sender<TableReservedEvent>,
}

impl PublishQueue {
    /// Starts the worker task and returns the queue handle along with the
    /// worker's join handle.
    pub fn start<P>(publisher: Arc<P>, policy: RetryPolicy) -> (Self, JoinHandle<()>)
    where
        P: EventPublisher + 'static,
    {
        Self::with_capacity(publisher, policy, DEFAULT_CAPACITY)
    }

    /// Starts the worker with an explicit queue capacity.
    pub fn with_capacity<P>(
        publisher: Arc<P>,
        policy: RetryPolicy,
        capacity: usize,
    ) -> (Self, JoinHandle<()>)
    where
        P: EventPublisher + 'static,
    {
        let (tx, mut rx) = mpsc::channel::<TableReservedEvent>(capacity);

        let worker = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                let payload = match serde_json::to_value(&event) {
                    Ok(payload) => payload,
                    Err(e) => {
                        tracing::error!(error = %e, "event serialization failed, dropping");
                        continue;
                    }
                };

                let delivered = send_with_retry(policy, TABLE_EVENTS_EXCHANGE, || {
                    let publisher = publisher.clone();
                    let payload = payload.clone();
                    async move {
                        publisher
                            .publish(TABLE_EVENTS_EXCHANGE, TABLE_RESERVED_KEY, &payload)
                            .await
                    }
                })
                .await;

                if delivered {
                    metrics::counter!("events_published_total").increment(1);
                    tracing::info!(
                        table_id = %event.table_id,
                        "table-reserved event published"
                    );
                } else {
                    metrics::counter!("events_publish_exhausted_total").increment(1);
                    tracing::error!(
                        table_id = %event.table_id,
                        max_attempts = policy.max_attempts,
                        "table-reserved event dropped after exhausting retries"
                    );
                }
            }
        });

        (Self { tx }, worker)
    }

    /// Enqueues an event without blocking.
    ///
    /// Returns `false` when the queue is full or the worker is gone; the
    /// event is dropped either way and the caller is expected to ignore
    /// the outcome.
    pub fn enqueue(&self, event: TableReservedEvent) -> bool {
        match self.tx.try_send(event) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(event)) => {
                metrics::counter!("publish_queue_dropped_total").increment(1);
                tracing::warn!(
                    table_id = %event.table_id,
                    "publish queue full, event dropped"
                );
                false
            }
            Err(mpsc::error::TrySendError::Closed(event)) => {
                tracing::error!(
                    table_id = %event.table_id,
                    "publish worker stopped, event dropped"
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::publisher::InMemoryBroker;
    use crate::topology::TABLE_RESERVED_QUEUE;
    use common::{RestaurantId, TableId};

    fn sample_event() -> TableReservedEvent {
        TableReservedEvent::new(
            TableId::new(),
            RestaurantId::new(),
            "2025-06-01".parse().unwrap(),
        )
    }

    #[tokio::test]
    async fn enqueued_event_reaches_bound_queue() {
        let broker = Arc::new(InMemoryBroker::new());
        let mut rx = broker.bind(TABLE_EVENTS_EXCHANGE, TABLE_RESERVED_KEY, TABLE_RESERVED_QUEUE);
        let (queue, _worker) = PublishQueue::start(broker.clone(), RetryPolicy::default());

        let event = sample_event();
        assert!(queue.enqueue(event.clone()));

        let payload = rx.recv().await.unwrap();
        let received: TableReservedEvent = serde_json::from_value(payload).unwrap();
        assert_eq!(received, event);
    }

    #[tokio::test(start_paused = true)]
    async fn broker_outage_exhausts_retries_without_escalating() {
        let broker = Arc::new(InMemoryBroker::new());
        broker.set_fail_on_publish(true);
        let (queue, _worker) = PublishQueue::start(broker.clone(), RetryPolicy::default());

        assert!(queue.enqueue(sample_event()));

        // Give the worker time to burn through its attempts
        tokio::time::sleep(std::time::Duration::from_secs(10)).await;
        assert_eq!(broker.published_count(), 0);
    }

    #[tokio::test]
    async fn full_queue_drops_instead_of_blocking() {
        let broker = Arc::new(InMemoryBroker::new());
        broker.set_fail_on_publish(true);
        // Capacity 1 and a worker stuck in backoff: the second enqueue
        // lands in the buffer, the third must drop
        let (queue, _worker) =
            PublishQueue::with_capacity(broker, RetryPolicy::default(), 1);

        queue.enqueue(sample_event());
        queue.enqueue(sample_event());
        assert!(!queue.enqueue(sample_event()));
    }
}
