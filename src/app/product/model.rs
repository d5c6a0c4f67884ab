//! 产品数据模型

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::repository::Entity;

/// 持久化的产品实体
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "database", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

impl Product {
    /// 尚未持久化的产品，id 由存储分配
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            description,
        }
    }
}

impl Entity for Product {
    fn id(&self) -> i32 {
        self.id
    }

    fn assign_id(&mut self, id: i32) {
        self.id = id;
    }
}

// 创建产品请求
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProductCreateRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,
}

// 更新产品请求
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProductUpdateRequest {
    /// 可选；若提供必须与路径中的 id 一致
    #[serde(default)]
    pub id: Option<i32>,

    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,
}

/// 产品响应
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
        }
    }
}
