use std::{collections::BTreeMap, path::PathBuf, sync::Arc};
use tokio::{fs, sync::RwLock};

use crate::errors::ServiceError;

/// Generic JSON file-backed key-value map store.
///
/// Persists a `BTreeMap<K, V>` to a JSON object file and mirrors it in memory.
/// A store created with [`JsonMapStore::ephemeral`] never touches disk.
pub struct JsonMapStore<K, V> {
    inner: RwLock<BTreeMap<K, V>>,
    file_path: Option<PathBuf>,
}

impl<K, V> JsonMapStore<K, V>
where
    K: Ord + serde::Serialize + serde::de::DeserializeOwned + Clone + Send + Sync,
    V: serde::Serialize + serde::de::DeserializeOwned + Clone + Send + Sync,
{
    /// Initialize the store from a path. Creates the file with an empty map if missing.
    /// Unparseable content is an error rather than an empty map.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| ServiceError::storage(parent.display(), e))?;
            }
        }

        let map: BTreeMap<K, V> = match fs::read(&file_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| ServiceError::storage(file_path.display(), e))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(ServiceError::storage(file_path.display(), e)),
        };

        let store = Self { inner: RwLock::new(map), file_path: Some(file_path) };
        store.save().await?;
        Ok(Arc::new(store))
    }

    pub fn ephemeral() -> Arc<Self> {
        Arc::new(Self { inner: RwLock::new(BTreeMap::new()), file_path: None })
    }

    async fn save(&self) -> Result<(), ServiceError> {
        let Some(file_path) = &self.file_path else { return Ok(()) };
        let map = self.inner.read().await;
        let data = serde_json::to_vec_pretty(&*map).map_err(|e| ServiceError::storage(file_path.display(), e))?;
        drop(map);
        let temp_path = file_path.with_extension("json.tmp");
        fs::write(&temp_path, data).await.map_err(|e| ServiceError::storage(temp_path.display(), e))?;
        fs::rename(&temp_path, file_path).await.map_err(|e| ServiceError::storage(file_path.display(), e))?;
        Ok(())
    }

    /// Get value by key.
    #[cfg(test)]
    pub(crate) async fn get(&self, key: &K) -> Option<V> {
        let map = self.inner.read().await;
        map.get(key).cloned()
    }

    /// Insert or update a value by key and persist.
    #[cfg(test)]
    pub(crate) async fn insert(&self, key: K, value: V) -> Result<(), ServiceError> {
        let mut map = self.inner.write().await;
        map.insert(key, value);
        drop(map);
        self.save().await
    }

    /// Apply a mutation to the underlying map and persist.
    pub async fn update_map<F, R>(&self, f: F) -> Result<R, ServiceError>
    where
        F: FnOnce(&mut BTreeMap<K, V>) -> Result<R, ServiceError>,
    {
        let mut map = self.inner.write().await;
        let out = f(&mut map)?;
        drop(map);
        self.save().await?;
        Ok(out)
    }
}
