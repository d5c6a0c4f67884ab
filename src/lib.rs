//! # 产品 CRUD 示例
//!
//! 基于 Axum 的单实体 REST API：
//! - 应用层：产品处理器、DTO 与产品仓储
//! - 核心层：通用仓储、错误类型、中间件
//! - 基础设施层：内存存储、PostgreSQL 存储、配置与日志

pub mod app;
pub mod core;
pub mod infrastructure;
pub mod utils;

pub use app::product::handler::AppState;
pub use app::product::model::{Product, ProductCreateRequest, ProductResponse, ProductUpdateRequest};
pub use app::product::repository::{product_repository, ProductRepository};
pub use app::router;
pub use crate::core::error::{ApiError, StoreError};
pub use crate::core::repository::{Entity, EntityStore, Repository, RepositoryBase};
pub use infrastructure::memory_store::MemoryStore;
