//! 客户端：HTTP 网关与状态容器

pub mod gateway;
pub mod state;

pub use gateway::{ClientError, Outcome, ProductClient};
pub use state::CatalogState;
