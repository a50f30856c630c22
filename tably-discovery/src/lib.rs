mod app;
mod client;
pub mod consul;
mod memory;
mod registry;

pub use app::{App, AppConfig};
pub use client::{CacheState, ClientConfig, ServiceClient};
pub use consul::{ConsulConfig, ConsulRegistry};
pub use memory::MemoryRegistry;
pub use registry::{generate_instance_id, Registration, Registry};
