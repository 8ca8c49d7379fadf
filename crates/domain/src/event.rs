//! Domain events published for downstream consumers.

use chrono::NaiveDate;
use common::{RestaurantId, TableId};
use serde::{Deserialize, Serialize};

/// The "table reserved" fact, published once per successful creation.
///
/// Consumed asynchronously by listeners that rebroadcast to live
/// subscribers and trigger notifications. Wire shape is camelCase JSON:
/// `{"tableId": …, "restaurantId": …, "reservationDate": …}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableReservedEvent {
    pub table_id: TableId,
    pub restaurant_id: RestaurantId,
    pub reservation_date: NaiveDate,
}

impl TableReservedEvent {
    pub fn new(table_id: TableId, restaurant_id: RestaurantId, reservation_date: NaiveDate) -> Self {
        Self {
            table_id,
            restaurant_id,
            reservation_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_uses_camel_case_wire_shape() {
        let event = TableReservedEvent::new(
            TableId::new(),
            RestaurantId::new(),
            "2025-06-01".parse().unwrap(),
        );

        let value = serde_json::to_value(&event).unwrap();
        assert!(value.get("tableId").is_some());
        assert!(value.get("restaurantId").is_some());
        assert_eq!(value["reservationDate"], "2025-06-01");
    }

    #[test]
    fn event_deserializes_regardless_of_field_order() {
        let table_id = TableId::new();
        let restaurant_id = RestaurantId::new();
        let json = format!(
            r#"{{"reservationDate":"2025-06-01","restaurantId":"{restaurant_id}","tableId":"{table_id}"}}"#
        );

        let event: TableReservedEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event.table_id, table_id);
        assert_eq!(event.restaurant_id, restaurant_id);
    }
}
