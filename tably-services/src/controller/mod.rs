mod metadata;
mod restaurant;
mod review;

pub use metadata::MetadataController;
pub use restaurant::RestaurantController;
pub use review::ReviewController;
