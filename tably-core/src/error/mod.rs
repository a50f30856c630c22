mod error;

pub use error::{Result, TablyErr};
