//! 核心仓储模块
//!
//! 仓储层是对某一实体类型的通用数据访问抽象，
//! 具体的读写交给构造时传入的存储句柄完成。

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::error::StoreError;

/// 可持久化实体
pub trait Entity: Clone + Send + Sync + 'static {
    fn id(&self) -> i32;
    fn assign_id(&mut self, id: i32);
}

/// 过滤谓词
pub type Predicate<'a, T> = &'a (dyn Fn(&T) -> bool + Send + Sync);

/// 按主键寻址的实体存储
///
/// 每个写操作返回时即已持久化。
#[async_trait]
pub trait EntityStore<T: Entity>: Send + Sync {
    /// 按 id 升序列出全部实体
    async fn list(&self, cancel: &CancellationToken) -> Result<Vec<T>, StoreError>;

    async fn find_by_key(&self, id: i32) -> Result<Option<T>, StoreError>;

    /// 分配新 id 并写入
    async fn insert(&self, item: T) -> Result<T, StoreError>;

    /// 覆盖同 id 的记录；记录不存在时返回 `StoreError::Concurrency`
    async fn update(&self, item: &T) -> Result<(), StoreError>;

    async fn remove(&self, id: i32) -> Result<(), StoreError>;
}

/// 通用仓储 trait
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    async fn get_all(&self, cancel: &CancellationToken) -> Result<Vec<T>, StoreError>;

    /// 不存在时返回 `Ok(None)`
    async fn get(&self, id: i32) -> Result<Option<T>, StoreError>;

    async fn add(&self, item: T) -> Result<T, StoreError>;

    /// 调用方负责事先确认实体存在
    async fn update(&self, item: T) -> Result<(), StoreError>;

    /// 实体不存在时不写入，也不报错
    async fn delete(&self, id: i32) -> Result<(), StoreError>;

    async fn find(&self, predicate: Predicate<'_, T>) -> Result<Vec<T>, StoreError> {
        let items = self.get_all(&CancellationToken::new()).await?;
        Ok(items.into_iter().filter(|item| predicate(item)).collect())
    }
}

/// 基础仓储实现
pub struct RepositoryBase<T: Entity> {
    store: Arc<dyn EntityStore<T>>,
}

impl<T: Entity> RepositoryBase<T> {
    pub fn new(store: Arc<dyn EntityStore<T>>) -> Self {
        Self { store }
    }
}

impl<T: Entity> Clone for RepositoryBase<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for RepositoryBase<T> {
    async fn get_all(&self, cancel: &CancellationToken) -> Result<Vec<T>, StoreError> {
        self.store.list(cancel).await
    }

    async fn get(&self, id: i32) -> Result<Option<T>, StoreError> {
        self.store.find_by_key(id).await
    }

    async fn add(&self, item: T) -> Result<T, StoreError> {
        self.store.insert(item).await
    }

    async fn update(&self, item: T) -> Result<(), StoreError> {
        self.store.update(&item).await
    }

    async fn delete(&self, id: i32) -> Result<(), StoreError> {
        if let Some(item) = self.get(id).await? {
            self.store.remove(item.id()).await?;
        }
        Ok(())
    }
}
