use std::sync::Arc;

use tably_core::{MemStore, Metadata, Restaurant, Result, TablyErr};

use crate::gateway::MetadataGateway;

pub struct RestaurantController {
    store: Arc<MemStore<Restaurant>>,
    metadata: Arc<MetadataGateway>,
}

impl RestaurantController {
    pub fn new(store: Arc<MemStore<Restaurant>>, metadata: Arc<MetadataGateway>) -> Self {
        Self { store, metadata }
    }

    pub fn list(&self) -> Vec<Restaurant> {
        self.store.all()
    }

    /// Fetch a restaurant and enrich it with its metadata record. The
    /// enrichment is best-effort: when the metadata service cannot be
    /// reached the restaurant is still returned with `None`.
    pub async fn get_by_id(&self, id: i64) -> Result<(Restaurant, Option<Metadata>)> {
        if id <= 0 {
            return Err(TablyErr::invalid_argument("id must be positive"));
        }
        let restaurant = self
            .store
            .by_id(id)
            .ok_or_else(|| TablyErr::not_found(format!("restaurant {id}")))?;

        let metadata = match self.metadata.get_by_id(restaurant.metadata_id).await {
            Ok(m) => Some(m),
            Err(e) => {
                log::warn!(
                    "metadata lookup for restaurant {id} failed, returning without it: {e}"
                );
                None
            }
        };
        Ok((restaurant, metadata))
    }

    /// Create a restaurant. The referenced metadata record must exist; unlike
    /// the read-side enrichment this check is load-bearing and any gateway
    /// failure blocks the write.
    pub async fn create(&self, restaurant: Restaurant) -> Result<Restaurant> {
        restaurant.validate()?;
        if restaurant.id < 0 {
            return Err(TablyErr::validation("id must be positive"));
        }

        if let Err(e) = self.metadata.get_by_id(restaurant.metadata_id).await {
            return Err(TablyErr::validation(format!(
                "metadata_id {} could not be verified: {e}",
                restaurant.metadata_id
            )));
        }

        self.store.add(restaurant)
    }
}
