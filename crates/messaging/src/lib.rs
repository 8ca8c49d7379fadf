//! Event publication and consumption for the reservation system.
//!
//! Covers the path between "a reservation was committed" and "downstream
//! consumers heard about it": a shared retry policy, the publisher
//! contract with an in-memory broker, a bounded background publish queue,
//! the topic-based live broadcaster, and the listener that rebroadcasts
//! consumed events and fires notifications.

pub mod broadcast;
pub mod error;
pub mod listener;
pub mod publisher;
pub mod queue;
pub mod retry;
pub mod topology;

pub use broadcast::{LiveBroadcaster, TopicBroadcaster};
pub use error::PublishError;
pub use listener::{NotificationSettings, TableReservedListener};
pub use publisher::{EventPublisher, InMemoryBroker};
pub use queue::PublishQueue;
pub use retry::{RetryPolicy, send_with_retry};
