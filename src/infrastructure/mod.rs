//! 基础设施层：存储后端与日志

#[cfg(feature = "database")]
pub mod database;
pub mod logger;
pub mod memory;
pub mod store;

pub use logger::Logger;
pub use memory::MemoryStore;
pub use store::{connect, ProductStore, StoreError};
