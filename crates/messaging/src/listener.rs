//! Consumer for table-reserved events.

use domain::TableReservedEvent;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::broadcast::LiveBroadcaster;
use crate::retry::{RetryPolicy, send_with_retry};
use crate::topology::LIVE_TABLE_RESERVED_TOPIC;
use gateways::NotificationGateway;

/// Recipient and template of the notification fired per consumed event.
///
/// The defaults are placeholders; deployments override them through
/// configuration until a real recipient-selection rule exists.
#[derive(Debug, Clone)]
pub struct NotificationSettings {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            to: "reservations@example.com".to_string(),
            subject: "New reservation created".to_string(),
            body: "A new reservation was created.".to_string(),
        }
    }
}

/// Consumes table-reserved events from the broker queue.
///
/// Per event: fires one best-effort notification, then rebroadcasts the
/// event to live subscribers with the shared retry policy. Neither
/// outcome escalates past this listener; failures are logged.
pub struct TableReservedListener<N, B> {
    notifications: N,
    broadcaster: B,
    settings: NotificationSettings,
    policy: RetryPolicy,
}

impl<N, B> TableReservedListener<N, B>
where
    N: NotificationGateway + 'static,
    B: LiveBroadcaster + Clone + 'static,
{
    pub fn new(
        notifications: N,
        broadcaster: B,
        settings: NotificationSettings,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            notifications,
            broadcaster,
            settings,
            policy,
        }
    }

    /// Spawns the consume loop over the given queue receiver.
    ///
    /// The loop ends when the broker side of the channel is dropped.
    pub fn spawn(self, mut queue: mpsc::UnboundedReceiver<Value>) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(payload) = queue.recv().await {
                self.handle(payload).await;
            }
            tracing::info!("table-reserved queue closed, listener stopping");
        })
    }

    /// Handles one consumed payload.
    #[tracing::instrument(skip(self, payload))]
    pub async fn handle(&self, payload: Value) {
        let event: TableReservedEvent = match serde_json::from_value(payload.clone()) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(error = %e, "undecodable payload on table-reserved queue");
                return;
            }
        };

        tracing::info!(
            table_id = %event.table_id,
            restaurant_id = %event.restaurant_id,
            "table-reserved event received"
        );
        metrics::counter!("table_reserved_events_consumed_total").increment(1);

        // Best-effort notification; failure must not block the rebroadcast
        match self
            .notifications
            .send(&self.settings.to, &self.settings.subject, &self.settings.body)
            .await
        {
            Ok(()) => tracing::info!(to = %self.settings.to, "notification sent"),
            Err(e) => {
                metrics::counter!("notification_failures_total").increment(1);
                tracing::warn!(error = %e, "notification service unreachable");
            }
        }

        let delivered = send_with_retry(self.policy, LIVE_TABLE_RESERVED_TOPIC, || {
            let broadcaster = self.broadcaster.clone();
            let payload = payload.clone();
            async move {
                broadcaster
                    .publish(LIVE_TABLE_RESERVED_TOPIC, &payload)
                    .await
            }
        })
        .await;

        if delivered {
            tracing::info!("table-reserved event rebroadcast to live subscribers");
        } else {
            metrics::counter!("rebroadcast_exhausted_total").increment(1);
            tracing::error!(
                max_attempts = self.policy.max_attempts,
                "live rebroadcast dropped after exhausting retries"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broadcast::TopicBroadcaster;
    use common::{RestaurantId, TableId};
    use gateways::InMemoryNotificationGateway;

    fn sample_payload() -> Value {
        serde_json::to_value(TableReservedEvent::new(
            TableId::new(),
            RestaurantId::new(),
            "2025-06-01".parse().unwrap(),
        ))
        .unwrap()
    }

    fn listener(
        notifications: InMemoryNotificationGateway,
        broadcaster: TopicBroadcaster,
    ) -> TableReservedListener<InMemoryNotificationGateway, TopicBroadcaster> {
        TableReservedListener::new(
            notifications,
            broadcaster,
            NotificationSettings::default(),
            RetryPolicy::default(),
        )
    }

    #[tokio::test]
    async fn event_triggers_notification_and_rebroadcast() {
        let notifications = InMemoryNotificationGateway::new();
        let broadcaster = TopicBroadcaster::new();
        let mut live = broadcaster.subscribe(LIVE_TABLE_RESERVED_TOPIC);
        let listener = listener(notifications.clone(), broadcaster);

        let payload = sample_payload();
        listener.handle(payload.clone()).await;

        assert_eq!(notifications.sent_count(), 1);
        assert_eq!(live.recv().await.unwrap(), payload);
    }

    #[tokio::test]
    async fn notification_failure_does_not_block_rebroadcast() {
        let notifications = InMemoryNotificationGateway::new();
        notifications.set_fail_on_send(true);
        let broadcaster = TopicBroadcaster::new();
        let mut live = broadcaster.subscribe(LIVE_TABLE_RESERVED_TOPIC);
        let listener = listener(notifications.clone(), broadcaster);

        let payload = sample_payload();
        listener.handle(payload.clone()).await;

        assert_eq!(notifications.sent_count(), 0);
        assert_eq!(live.recv().await.unwrap(), payload);
    }

    #[tokio::test(start_paused = true)]
    async fn rebroadcast_failure_is_swallowed_after_retries() {
        let notifications = InMemoryNotificationGateway::new();
        let broadcaster = TopicBroadcaster::new();
        broadcaster.set_fail_on_publish(true);
        let listener = listener(notifications.clone(), broadcaster);

        // Must return despite exhausting all rebroadcast attempts
        listener.handle(sample_payload()).await;
        assert_eq!(notifications.sent_count(), 1);
    }

    #[tokio::test]
    async fn undecodable_payload_is_ignored() {
        let notifications = InMemoryNotificationGateway::new();
        let broadcaster = TopicBroadcaster::new();
        let listener = listener(notifications.clone(), broadcaster);

        listener.handle(serde_json::json!({"not": "an event"})).await;
        assert_eq!(notifications.sent_count(), 0);
    }

    #[tokio::test]
    async fn spawned_listener_drains_queue() {
        let notifications = InMemoryNotificationGateway::new();
        let broadcaster = TopicBroadcaster::new();
        let mut live = broadcaster.subscribe(LIVE_TABLE_RESERVED_TOPIC);
        let listener = listener(notifications.clone(), broadcaster);

        let (tx, rx) = mpsc::unbounded_channel();
        let handle = listener.spawn(rx);

        let payload = sample_payload();
        tx.send(payload.clone()).unwrap();
        assert_eq!(live.recv().await.unwrap(), payload);

        drop(tx);
        handle.await.unwrap();
        assert_eq!(notifications.sent_count(), 1);
    }
}
