//! # 商品目录服务
//!
//! - `app`: `/api/products` 的 CRUD 接口
//! - `core`: 错误类型、统一响应信封、中间件
//! - `infrastructure`: 存储后端（内存 / PostgreSQL）与日志
//! - `client`: HTTP 客户端与可订阅的商品列表状态
//! - `config`: TOML 配置与环境变量覆盖

pub mod app;
pub mod client;
pub mod config;
pub mod core;
pub mod infrastructure;

pub use app::product::handler::AppState;
pub use app::product::model::{NewProduct, Product, ProductId, ProductUpdate};
pub use app::product::service::ProductService;
pub use config::Config;
