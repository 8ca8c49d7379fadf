//! Table-availability gateway trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::{ReservationId, TableId};
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

/// The slice of remote table state this service consumes: whether the
/// table currently holds a reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableState {
    pub id: TableId,
    pub reservation_id: Option<ReservationId>,
}

impl TableState {
    /// Returns true if the table currently holds a reservation reference.
    pub fn is_reserved(&self) -> bool {
        self.reservation_id.is_some()
    }
}

/// Trait for the remote table-availability service.
#[async_trait]
pub trait TableGateway: Send + Sync {
    /// Fetches table state by ID, or `None` if the table does not exist.
    async fn get(&self, id: TableId) -> Result<Option<TableState>, GatewayError>;

    /// Assigns `reservation_id` to the table, but only if its reservation
    /// reference is still empty.
    ///
    /// Fails with [`GatewayError::Conflict`] if another reservation claimed
    /// the table between the caller's read and this write. Any other error
    /// means the write may or may not have landed.
    async fn update_if_unreserved(
        &self,
        id: TableId,
        reservation_id: ReservationId,
    ) -> Result<TableState, GatewayError>;
}

#[derive(Debug, Default)]
struct InMemoryTableState {
    tables: HashMap<TableId, TableState>,
    fail_on_update: bool,
    conflict_on_update: bool,
}

/// In-memory table gateway for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTableGateway {
    state: Arc<RwLock<InMemoryTableState>>,
}

impl InMemoryTableGateway {
    /// Creates a new in-memory table gateway with no tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an unreserved table and returns its ID.
    pub fn add_table(&self) -> TableId {
        let id = TableId::new();
        self.state.write().unwrap().tables.insert(
            id,
            TableState {
                id,
                reservation_id: None,
            },
        );
        id
    }

    /// Registers a table already holding the given reservation reference.
    pub fn add_reserved_table(&self, reservation_id: ReservationId) -> TableId {
        let id = TableId::new();
        self.state.write().unwrap().tables.insert(
            id,
            TableState {
                id,
                reservation_id: Some(reservation_id),
            },
        );
        id
    }

    /// Configures the gateway to fail the next update with a transport
    /// error (not a conflict).
    pub fn set_fail_on_update(&self, fail: bool) {
        self.state.write().unwrap().fail_on_update = fail;
    }

    /// Configures the next conditional update to be rejected as if a
    /// concurrent reservation claimed the table between the caller's read
    /// and write. Lets tests stage a lost race.
    pub fn set_conflict_on_update(&self, conflict: bool) {
        self.state.write().unwrap().conflict_on_update = conflict;
    }
}

#[async_trait]
impl TableGateway for InMemoryTableGateway {
    async fn get(&self, id: TableId) -> Result<Option<TableState>, GatewayError> {
        Ok(self.state.read().unwrap().tables.get(&id).cloned())
    }

    async fn update_if_unreserved(
        &self,
        id: TableId,
        reservation_id: ReservationId,
    ) -> Result<TableState, GatewayError> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_update {
            return Err(GatewayError::Transport(
                "table service unavailable".to_string(),
            ));
        }

        if state.conflict_on_update {
            return Err(GatewayError::Conflict);
        }

        let table = state
            .tables
            .get_mut(&id)
            .ok_or_else(|| GatewayError::NotFound(format!("table {id}")))?;

        if table.reservation_id.is_some() {
            return Err(GatewayError::Conflict);
        }

        table.reservation_id = Some(reservation_id);
        Ok(table.clone())
    }
}
