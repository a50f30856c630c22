pub mod controller;
pub mod env;
pub mod gateway;
pub mod handler;

pub use controller::{MetadataController, RestaurantController, ReviewController};
pub use gateway::MetadataGateway;
