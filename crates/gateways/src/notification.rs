//! Notification gateway trait and in-memory implementation.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::error::GatewayError;

/// Trait for the remote email-notification service.
///
/// Sends are best-effort: callers log failures and move on.
#[async_trait]
pub trait NotificationGateway: Send + Sync {
    /// Fires an email send.
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), GatewayError>;
}

/// A notification captured by the in-memory gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentNotification {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Default)]
struct InMemoryNotificationState {
    sent: Vec<SentNotification>,
    fail_on_send: bool,
}

/// In-memory notification gateway for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNotificationGateway {
    state: Arc<RwLock<InMemoryNotificationState>>,
}

impl InMemoryNotificationGateway {
    /// Creates a new in-memory notification gateway.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the gateway to fail sends.
    pub fn set_fail_on_send(&self, fail: bool) {
        self.state.write().unwrap().fail_on_send = fail;
    }

    /// Returns the number of notifications sent.
    pub fn sent_count(&self) -> usize {
        self.state.read().unwrap().sent.len()
    }

    /// Returns all captured notifications.
    pub fn sent(&self) -> Vec<SentNotification> {
        self.state.read().unwrap().sent.clone()
    }
}

#[async_trait]
impl NotificationGateway for InMemoryNotificationGateway {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), GatewayError> {
        let mut state = self.state.write().unwrap();
        if state.fail_on_send {
            return Err(GatewayError::Transport(
                "notification service unavailable".to_string(),
            ));
        }
        state.sent.push(SentNotification {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_captures_notification() {
        let gateway = InMemoryNotificationGateway::new();
        gateway
            .send("guest@example.com", "New reservation", "A table was reserved.")
            .await
            .unwrap();

        assert_eq!(gateway.sent_count(), 1);
        assert_eq!(gateway.sent()[0].to, "guest@example.com");
    }

    #[tokio::test]
    async fn failed_send_captures_nothing() {
        let gateway = InMemoryNotificationGateway::new();
        gateway.set_fail_on_send(true);

        let result = gateway.send("guest@example.com", "s", "b").await;
        assert!(result.is_err());
        assert_eq!(gateway.sent_count(), 0);
    }
}
