use std::sync::Arc;

use tably_core::{MemStore, Result, Review, TablyErr};

pub struct ReviewController {
    store: Arc<MemStore<Review>>,
}

impl ReviewController {
    pub fn new(store: Arc<MemStore<Review>>) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Vec<Review> {
        self.store.all()
    }

    pub fn list_for_restaurant(&self, restaurant_id: i64) -> Vec<Review> {
        self.store.filter(|r| r.restaurant_id == restaurant_id)
    }

    pub fn get_by_id(&self, id: i64) -> Result<Review> {
        if id <= 0 {
            return Err(TablyErr::invalid_argument("id must be positive"));
        }
        self.store
            .by_id(id)
            .ok_or_else(|| TablyErr::not_found(format!("review {id}")))
    }

    pub fn create(&self, review: Review) -> Result<Review> {
        review.validate()?;
        if review.id < 0 {
            return Err(TablyErr::validation("id must be positive"));
        }
        self.store.add(review)
    }
}
