pub mod error;
pub mod model;
pub mod store;

pub use error::{Result, TablyErr};
pub use model::{Metadata, Restaurant, Review};
pub use store::{Entity, MemStore};
