//! Service layer enforcing campaign and keyword invariants on top of the
//! JSON collections.
//! - `storage`: whole-collection load/save, file-backed or in memory.
//! - `repository`: shared stores, id sequences and the operation lock.
//! - `services`: campaign and keyword rules, including the cascading delete.

pub mod errors;
pub mod runtime;
pub mod storage;
pub mod repository;
pub mod services;

pub use errors::ServiceError;
pub use repository::Repository;
pub use services::{CampaignService, DeleteOutcome, KeywordService};
