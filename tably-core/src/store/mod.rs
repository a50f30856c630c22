use std::sync::RwLock;

use crate::error::{Result, TablyErr};

/// Record stored in a [`MemStore`]. An ID of zero means "not yet assigned".
pub trait Entity: Clone + Send + Sync + 'static {
    fn id(&self) -> i64;
    fn set_id(&mut self, id: i64);
}

/// Thread-safe, append-only in-memory collection. One store per service;
/// records are never updated or deleted.
pub struct MemStore<T: Entity> {
    data: RwLock<Vec<T>>,
}

impl<T: Entity> MemStore<T> {
    pub fn new() -> Self {
        Self {
            data: RwLock::new(Vec::with_capacity(16)),
        }
    }

    /// Snapshot of all records. Callers get a copy, never the live backing
    /// collection.
    pub fn all(&self) -> Vec<T> {
        self.data.read().unwrap().clone()
    }

    pub fn by_id(&self, id: i64) -> Option<T> {
        self.data.read().unwrap().iter().find(|x| x.id() == id).cloned()
    }

    pub fn filter(&self, pred: impl Fn(&T) -> bool) -> Vec<T> {
        self.data
            .read()
            .unwrap()
            .iter()
            .filter(|x| pred(x))
            .cloned()
            .collect()
    }

    /// Append a record. A zero ID is assigned `max(existing) + 1` (1 when
    /// empty); the next-ID computation and the append happen under the same
    /// exclusive lock so concurrent writers never collide. A caller-supplied
    /// ID must be unused.
    pub fn add(&self, mut record: T) -> Result<T> {
        let mut data = self.data.write().unwrap();
        if record.id() == 0 {
            let next = data.iter().map(|x| x.id()).max().unwrap_or(0) + 1;
            record.set_id(next);
        } else if data.iter().any(|x| x.id() == record.id()) {
            return Err(TablyErr::validation(format!(
                "id {} already exists",
                record.id()
            )));
        }
        data.push(record.clone());
        Ok(record)
    }

    pub fn len(&self) -> usize {
        self.data.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().unwrap().is_empty()
    }
}

impl<T: Entity> Default for MemStore<T> {
    fn default() -> Self {
        Self::new()
    }
}
