//! Names of the exchanges, routing keys, queues, and topics this service
//! publishes to and consumes from.

/// Exchange carrying table domain events.
pub const TABLE_EVENTS_EXCHANGE: &str = "table.events";

/// Routing key for the table-reserved event.
pub const TABLE_RESERVED_KEY: &str = "table.reserved";

/// Queue bound to the table-reserved routing key, consumed by the
/// listener.
pub const TABLE_RESERVED_QUEUE: &str = "table.reserved.queue";

/// Live-update topic real-time subscribers listen on.
pub const LIVE_TABLE_RESERVED_TOPIC: &str = "live.table.reserved";
