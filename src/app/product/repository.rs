//! 产品仓储

use std::sync::Arc;

use super::model::Product;
use crate::core::repository::{EntityStore, Repository, RepositoryBase};

/// 产品仓储 trait，处理器只依赖它
pub trait ProductRepository: Repository<Product> {}

impl<R: Repository<Product>> ProductRepository for R {}

pub fn product_repository(store: Arc<dyn EntityStore<Product>>) -> RepositoryBase<Product> {
    RepositoryBase::new(store)
}
