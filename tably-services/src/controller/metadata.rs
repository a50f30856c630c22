use std::sync::Arc;

use tably_core::{MemStore, Metadata, Result, TablyErr};

pub struct MetadataController {
    store: Arc<MemStore<Metadata>>,
}

impl MetadataController {
    pub fn new(store: Arc<MemStore<Metadata>>) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Vec<Metadata> {
        self.store.all()
    }

    pub fn get_by_id(&self, id: i64) -> Result<Metadata> {
        if id <= 0 {
            return Err(TablyErr::invalid_argument("id must be positive"));
        }
        self.store
            .by_id(id)
            .ok_or_else(|| TablyErr::not_found(format!("metadata {id}")))
    }

    pub fn create(&self, metadata: Metadata) -> Result<Metadata> {
        metadata.validate()?;
        if metadata.id < 0 {
            return Err(TablyErr::validation("id must be positive"));
        }
        self.store.add(metadata)
    }
}
