use std::{marker::PhantomData, path::{Path, PathBuf}, sync::Arc};

use async_trait::async_trait;
use models::Record;
use tokio::fs;
use tracing::debug;

use super::{check_ids, CollectionStore};
use crate::errors::ServiceError;

/// A collection persisted as one JSON array file.
///
/// Nothing is cached: every `load` reads the file and every `save` rewrites
/// it through a temp file and a rename, so readers only ever see complete
/// snapshots.
pub struct JsonFileStore<T> {
    file_path: PathBuf,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> JsonFileStore<T> {
    /// Open the store at `path`. Creates the file with an empty array if missing.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| ServiceError::storage(parent.display(), e))?;
            }
        }

        let store = Self { file_path, _record: PhantomData };
        match fs::metadata(&store.file_path).await {
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                store.save(&[]).await?;
                debug!(collection = T::COLLECTION, path = %store.file_path.display(), "initialized empty collection");
            }
            Err(e) => return Err(ServiceError::storage(store.file_path.display(), e)),
        }
        Ok(Arc::new(store))
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

#[async_trait]
impl<T: Record> CollectionStore<T> for JsonFileStore<T> {
    async fn load(&self) -> Result<Vec<T>, ServiceError> {
        let bytes = fs::read(&self.file_path)
            .await
            .map_err(|e| ServiceError::storage(self.file_path.display(), e))?;
        let records: Vec<T> = serde_json::from_slice(&bytes)
            .map_err(|e| ServiceError::storage(self.file_path.display(), e))?;
        check_ids(&records)?;
        Ok(records)
    }

    async fn save(&self, records: &[T]) -> Result<(), ServiceError> {
        let data = serde_json::to_vec_pretty(records)
            .map_err(|e| ServiceError::storage(T::COLLECTION, e))?;

        let temp_path = self.file_path.with_extension("json.tmp");
        fs::write(&temp_path, data)
            .await
            .map_err(|e| ServiceError::storage(temp_path.display(), e))?;
        fs::rename(&temp_path, &self.file_path)
            .await
            .map_err(|e| ServiceError::storage(self.file_path.display(), e))?;

        debug!(collection = T::COLLECTION, count = records.len(), "saved collection");
        Ok(())
    }
}
