use std::sync::Arc;

use async_trait::async_trait;
use models::Record;
use tokio::sync::RwLock;

use super::CollectionStore;
use crate::errors::ServiceError;

/// Volatile collection kept in process memory.
pub struct MemoryStore<T> {
    inner: RwLock<Vec<T>>,
}

impl<T: Record> MemoryStore<T> {
    pub fn new() -> Arc<Self> {
        Arc::new(Self { inner: RwLock::new(Vec::new()) })
    }

    #[cfg(test)]
    pub(crate) fn with_records(records: Vec<T>) -> Arc<Self> {
        Arc::new(Self { inner: RwLock::new(records) })
    }
}

#[async_trait]
impl<T: Record> CollectionStore<T> for MemoryStore<T> {
    async fn load(&self) -> Result<Vec<T>, ServiceError> {
        Ok(self.inner.read().await.clone())
    }

    async fn save(&self, records: &[T]) -> Result<(), ServiceError> {
        *self.inner.write().await = records.to_vec();
        Ok(())
    }
}
