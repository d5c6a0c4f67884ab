//! 内存存储
//!
//! 进程内的实体存储，生命周期由创建者持有，不存在全局实例。
//! id 从 1 开始单调递增，删除后不会复用。

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::core::error::StoreError;
use crate::core::repository::{Entity, EntityStore};

struct Table<T> {
    rows: BTreeMap<i32, T>,
    next_id: i32,
}

pub struct MemoryStore<T: Entity> {
    table: RwLock<Table<T>>,
}

impl<T: Entity> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(Table {
                rows: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl<T: Entity> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Entity> EntityStore<T> for MemoryStore<T> {
    async fn list(&self, cancel: &CancellationToken) -> Result<Vec<T>, StoreError> {
        if cancel.is_cancelled() {
            return Err(StoreError::Cancelled);
        }
        let table = self.table.read().await;
        Ok(table.rows.values().cloned().collect())
    }

    async fn find_by_key(&self, id: i32) -> Result<Option<T>, StoreError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn insert(&self, mut item: T) -> Result<T, StoreError> {
        let mut table = self.table.write().await;
        let id = table.next_id;
        table.next_id = id
            .checked_add(1)
            .ok_or_else(|| StoreError::Unavailable("id 序列已耗尽".to_string()))?;

        item.assign_id(id);
        table.rows.insert(id, item.clone());
        debug!(id, "内存存储: 插入记录");
        Ok(item)
    }

    async fn update(&self, item: &T) -> Result<(), StoreError> {
        let mut table = self.table.write().await;
        match table.rows.get_mut(&item.id()) {
            Some(row) => {
                *row = item.clone();
                Ok(())
            }
            None => Err(StoreError::Concurrency(item.id())),
        }
    }

    async fn remove(&self, id: i32) -> Result<(), StoreError> {
        self.table.write().await.rows.remove(&id);
        debug!(id, "内存存储: 删除记录");
        Ok(())
    }
}
