use serde::{Deserialize, Serialize};

use crate::error::{Result, TablyErr};
use crate::store::Entity;

/// Restaurant metadata owned by the metadata service.
///
/// Missing JSON fields decode to their zero values so that `validate()` can
/// reject them as caller errors instead of failing in the decoder.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Metadata {
    pub id: i64,
    pub name: String,
    pub cuisine_type: String,
    pub price_range: String,
    pub address: String,
    pub city: String,
}

impl Metadata {
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(TablyErr::validation("name is required"));
        }
        if self.cuisine_type.is_empty() {
            return Err(TablyErr::validation("cuisine_type is required"));
        }
        Ok(())
    }
}

impl Entity for Metadata {
    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
}

/// Restaurant record; `metadata_id` is a foreign key into the metadata
/// service's ID space.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Restaurant {
    pub id: i64,
    pub metadata_id: i64,
    pub display_name: String,
}

impl Restaurant {
    pub fn validate(&self) -> Result<()> {
        if self.display_name.is_empty() {
            return Err(TablyErr::validation("display_name is required"));
        }
        if self.metadata_id <= 0 {
            return Err(TablyErr::validation("metadata_id must be positive"));
        }
        Ok(())
    }
}

impl Entity for Restaurant {
    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
}

/// Review record; `restaurant_id` is a foreign key into the restaurant
/// service's ID space.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Review {
    pub id: i64,
    pub restaurant_id: i64,
    pub rating: i32,
    pub comment: String,
}

impl Review {
    pub fn validate(&self) -> Result<()> {
        if self.restaurant_id <= 0 {
            return Err(TablyErr::validation("restaurant_id must be positive"));
        }
        if !(1..=5).contains(&self.rating) {
            return Err(TablyErr::validation("rating must be between 1 and 5"));
        }
        Ok(())
    }
}

impl Entity for Review {
    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
}
