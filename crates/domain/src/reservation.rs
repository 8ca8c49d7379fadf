//! The reservation record.

use chrono::NaiveDate;
use common::{ReservationId, RestaurantId, TableId};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A booking linking one table, one restaurant, a date, and a party size.
///
/// The identifier is assigned at creation and never changes. The table and
/// restaurant associations are immutable after creation; only the date and
/// party size can be updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    id: ReservationId,
    reservation_date: NaiveDate,
    party_size: u32,
    table_id: TableId,
    restaurant_id: RestaurantId,
}

impl Reservation {
    /// Creates a new reservation with a fresh identifier.
    ///
    /// Fails with `InvalidPartySize` if `party_size` is zero.
    pub fn new(
        reservation_date: NaiveDate,
        party_size: u32,
        table_id: TableId,
        restaurant_id: RestaurantId,
    ) -> Result<Self, DomainError> {
        if party_size == 0 {
            return Err(DomainError::InvalidPartySize(party_size));
        }
        Ok(Self {
            id: ReservationId::new(),
            reservation_date,
            party_size,
            table_id,
            restaurant_id,
        })
    }

    /// Reconstructs a reservation from stored fields.
    ///
    /// Intended for store implementations hydrating persisted rows; does
    /// not re-validate the party size.
    pub fn from_parts(
        id: ReservationId,
        reservation_date: NaiveDate,
        party_size: u32,
        table_id: TableId,
        restaurant_id: RestaurantId,
    ) -> Self {
        Self {
            id,
            reservation_date,
            party_size,
            table_id,
            restaurant_id,
        }
    }

    /// Overwrites the date and party size, keeping identity and the
    /// table/restaurant association.
    ///
    /// Fails with `InvalidPartySize` if `party_size` is zero.
    pub fn reschedule(
        &mut self,
        reservation_date: NaiveDate,
        party_size: u32,
    ) -> Result<(), DomainError> {
        if party_size == 0 {
            return Err(DomainError::InvalidPartySize(party_size));
        }
        self.reservation_date = reservation_date;
        self.party_size = party_size;
        Ok(())
    }

    pub fn id(&self) -> ReservationId {
        self.id
    }

    pub fn reservation_date(&self) -> NaiveDate {
        self.reservation_date
    }

    pub fn party_size(&self) -> u32 {
        self.party_size
    }

    pub fn table_id(&self) -> TableId {
        self.table_id
    }

    pub fn restaurant_id(&self) -> RestaurantId {
        self.restaurant_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn new_reservation_keeps_inputs() {
        let table_id = TableId::new();
        let restaurant_id = RestaurantId::new();
        let reservation =
            Reservation::new(date("2025-06-01"), 4, table_id, restaurant_id).unwrap();

        assert_eq!(reservation.reservation_date(), date("2025-06-01"));
        assert_eq!(reservation.party_size(), 4);
        assert_eq!(reservation.table_id(), table_id);
        assert_eq!(reservation.restaurant_id(), restaurant_id);
    }

    #[test]
    fn zero_party_size_rejected() {
        let result = Reservation::new(date("2025-06-01"), 0, TableId::new(), RestaurantId::new());
        assert_eq!(result.unwrap_err(), DomainError::InvalidPartySize(0));
    }

    #[test]
    fn reschedule_overwrites_date_and_size_only() {
        let table_id = TableId::new();
        let mut reservation =
            Reservation::new(date("2025-06-01"), 4, table_id, RestaurantId::new()).unwrap();
        let id = reservation.id();

        reservation.reschedule(date("2025-07-15"), 6).unwrap();

        assert_eq!(reservation.id(), id);
        assert_eq!(reservation.reservation_date(), date("2025-07-15"));
        assert_eq!(reservation.party_size(), 6);
        assert_eq!(reservation.table_id(), table_id);
    }

    #[test]
    fn reschedule_rejects_zero_party_size() {
        let mut reservation =
            Reservation::new(date("2025-06-01"), 4, TableId::new(), RestaurantId::new()).unwrap();
        let before = reservation.clone();

        assert!(reservation.reschedule(date("2025-07-15"), 0).is_err());
        assert_eq!(reservation, before);
    }
}
