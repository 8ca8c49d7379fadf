//! Typed client contracts for the remote services the orchestrator
//! depends on: table availability, restaurant catalog, and notifications.
//!
//! Each contract is a trait with two implementations: an in-memory double
//! with failure injection for tests and default wiring, and an HTTP client
//! for production deployments.

pub mod error;
pub mod http;
pub mod notification;
pub mod restaurant;
pub mod table;

pub use error::GatewayError;
pub use http::{HttpNotificationGateway, HttpRestaurantGateway, HttpTableGateway};
pub use notification::{InMemoryNotificationGateway, NotificationGateway, SentNotification};
pub use restaurant::{InMemoryRestaurantGateway, RestaurantGateway, RestaurantInfo};
pub use table::{InMemoryTableGateway, TableGateway, TableState};
