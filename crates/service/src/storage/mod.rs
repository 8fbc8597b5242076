//! Storage abstractions for service layer
//!
//! Every collection is loaded and saved as a whole. Implementations do no
//! locking of their own; `Repository` serializes access.

use std::collections::HashSet;

use async_trait::async_trait;
use models::Record;

use crate::errors::ServiceError;

pub mod json_file_store;
pub mod json_map_store;
pub mod memory_store;

pub use json_file_store::JsonFileStore;
pub use json_map_store::JsonMapStore;
pub use memory_store::MemoryStore;

/// Whole-collection persistence for one record type.
#[async_trait]
pub trait CollectionStore<T: Record>: Send + Sync {
    /// Read and parse the full collection in persisted order.
    async fn load(&self) -> Result<Vec<T>, ServiceError>;

    /// Replace the full collection with `records`.
    async fn save(&self, records: &[T]) -> Result<(), ServiceError>;
}

/// Reject collections whose ids are zero or repeated.
pub(crate) fn check_ids<T: Record>(records: &[T]) -> Result<(), ServiceError> {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        let id = record.id();
        if id == 0 {
            return Err(ServiceError::Storage(format!("{}: id must be positive", T::COLLECTION)));
        }
        if !seen.insert(id) {
            return Err(ServiceError::Storage(format!("{}: duplicate id {}", T::COLLECTION, id)));
        }
    }
    Ok(())
}

/// Highest id present in a collection, 0 when empty.
pub(crate) fn max_id<T: Record>(records: &[T]) -> u64 {
    records.iter().map(Record::id).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::Campaign;

    fn campaign(id: u64) -> Campaign {
        Campaign { id, name: format!("c{id}"), daily_budget: 1.0 }
    }

    #[test]
    fn check_ids_rejects_zero_and_duplicates() {
        assert!(check_ids(&[campaign(1), campaign(2)]).is_ok());
        assert!(matches!(check_ids(&[campaign(0)]), Err(ServiceError::Storage(_))));
        assert!(matches!(check_ids(&[campaign(3), campaign(3)]), Err(ServiceError::Storage(_))));
    }

    #[test]
    fn max_id_of_empty_is_zero() {
        assert_eq!(max_id::<Campaign>(&[]), 0);
        assert_eq!(max_id(&[campaign(4), campaign(9), campaign(2)]), 9);
    }
}
