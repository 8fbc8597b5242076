//! Shared state behind both services: the two collections, the id
//! sequences and the single lock serializing every load-validate-save span.

use std::sync::Arc;

use configs::StorageConfig;
use models::{Campaign, Keyword, Record};
use tokio::sync::{Mutex, MutexGuard};
use tracing::info;

use crate::errors::ServiceError;
use crate::storage::{max_id, CollectionStore, JsonFileStore, JsonMapStore, MemoryStore};

pub struct Repository {
    campaigns: Arc<dyn CollectionStore<Campaign>>,
    keywords: Arc<dyn CollectionStore<Keyword>>,
    sequences: Arc<JsonMapStore<String, u64>>,
    lock: Mutex<()>,
}

impl Repository {
    pub fn new(
        campaigns: Arc<dyn CollectionStore<Campaign>>,
        keywords: Arc<dyn CollectionStore<Keyword>>,
        sequences: Arc<JsonMapStore<String, u64>>,
    ) -> Arc<Self> {
        Arc::new(Self { campaigns, keywords, sequences, lock: Mutex::new(()) })
    }

    /// File-backed repository laid out according to `cfg`.
    pub async fn open(cfg: &StorageConfig) -> Result<Arc<Self>, ServiceError> {
        let campaigns = JsonFileStore::<Campaign>::open(cfg.campaigns_path()).await?;
        let keywords = JsonFileStore::<Keyword>::open(cfg.keywords_path()).await?;
        let sequences = JsonMapStore::<String, u64>::new(cfg.sequences_path()).await?;
        info!(
            campaigns = %campaigns.path().display(),
            keywords = %keywords.path().display(),
            "opened json collections"
        );
        Ok(Self::new(campaigns, keywords, sequences))
    }

    pub fn in_memory() -> Arc<Self> {
        Self::new(MemoryStore::<Campaign>::new(), MemoryStore::<Keyword>::new(), JsonMapStore::ephemeral())
    }

    pub(crate) async fn lock(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().await
    }

    pub(crate) fn campaigns(&self) -> &dyn CollectionStore<Campaign> {
        self.campaigns.as_ref()
    }

    pub(crate) fn keywords(&self) -> &dyn CollectionStore<Keyword> {
        self.keywords.as_ref()
    }

    /// Allocate the next id for `T`. Ids are never handed out twice, even
    /// after the records holding them are deleted.
    pub(crate) async fn next_id<T: Record>(&self, existing: &[T]) -> Result<u64, ServiceError> {
        let current_max = max_id(existing);
        self.sequences
            .update_map(|seqs| {
                let high = seqs.get(T::COLLECTION).copied().unwrap_or(0).max(current_max);
                let next = high.checked_add(1).ok_or_else(|| {
                    ServiceError::Storage(format!("{} id space exhausted", T::COLLECTION))
                })?;
                seqs.insert(T::COLLECTION.to_string(), next);
                Ok(next)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn campaign(id: u64) -> Campaign {
        Campaign { id, name: format!("c{id}"), daily_budget: 0.0 }
    }

    #[tokio::test]
    async fn next_id_tracks_high_water_mark() -> Result<(), anyhow::Error> {
        let repo = Repository::in_memory();
        assert_eq!(repo.next_id::<Campaign>(&[]).await?, 1);
        assert_eq!(repo.next_id::<Campaign>(&[campaign(1)]).await?, 2);
        // collection emptied: still no reuse
        assert_eq!(repo.next_id::<Campaign>(&[]).await?, 3);
        // sequences are per collection
        assert_eq!(repo.next_id::<Keyword>(&[]).await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn next_id_catches_up_with_existing_records() -> Result<(), anyhow::Error> {
        let repo = Repository::in_memory();
        assert_eq!(repo.next_id(&[campaign(4), campaign(10)]).await?, 11);
        Ok(())
    }
}
