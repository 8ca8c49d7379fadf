//! Restaurant-catalog gateway trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::RestaurantId;
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

/// Restaurant metadata surfaced by the catalog service.
///
/// Existence is all the orchestrator checks; the name is carried for
/// logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantInfo {
    pub id: RestaurantId,
    pub name: String,
}

/// Trait for the remote restaurant-catalog service.
#[async_trait]
pub trait RestaurantGateway: Send + Sync {
    /// Fetches restaurant metadata by ID, or `None` if it does not exist.
    async fn get(&self, id: RestaurantId) -> Result<Option<RestaurantInfo>, GatewayError>;
}

#[derive(Debug, Default)]
struct InMemoryRestaurantState {
    restaurants: HashMap<RestaurantId, RestaurantInfo>,
    fail_on_get: bool,
}

/// In-memory restaurant gateway for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRestaurantGateway {
    state: Arc<RwLock<InMemoryRestaurantState>>,
}

impl InMemoryRestaurantGateway {
    /// Creates a new in-memory restaurant gateway with no restaurants.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a restaurant and returns its ID.
    pub fn add_restaurant(&self, name: impl Into<String>) -> RestaurantId {
        let id = RestaurantId::new();
        self.state.write().unwrap().restaurants.insert(
            id,
            RestaurantInfo {
                id,
                name: name.into(),
            },
        );
        id
    }

    /// Configures the gateway to fail lookups with a transport error.
    pub fn set_fail_on_get(&self, fail: bool) {
        self.state.write().unwrap().fail_on_get = fail;
    }
}

#[async_trait]
impl RestaurantGateway for InMemoryRestaurantGateway {
    async fn get(&self, id: RestaurantId) -> Result<Option<RestaurantInfo>, GatewayError> {
        let state = self.state.read().unwrap();
        if state.fail_on_get {
            return Err(GatewayError::Transport(
                "restaurant service unavailable".to_string(),
            ));
        }
        Ok(state.restaurants.get(&id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn registered_restaurant_is_found() {
        let gateway = InMemoryRestaurantGateway::new();
        let id = gateway.add_restaurant("Cantina do Porto");

        let info = gateway.get(id).await.unwrap().unwrap();
        assert_eq!(info.name, "Cantina do Porto");
    }

    #[tokio::test]
    async fn unknown_restaurant_returns_none() {
        let gateway = InMemoryRestaurantGateway::new();
        assert!(gateway.get(RestaurantId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn fail_on_get_surfaces_transport_error() {
        let gateway = InMemoryRestaurantGateway::new();
        let id = gateway.add_restaurant("Cantina do Porto");
        gateway.set_fail_on_get(true);

        assert!(matches!(
            gateway.get(id).await.unwrap_err(),
            GatewayError::Transport(_)
        ));
    }
}
