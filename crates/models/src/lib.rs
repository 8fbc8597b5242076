//! Typed records persisted by the campaign store.
//!
//! Field names match the on-disk JSON layout exactly; unknown fields are
//! rejected so a malformed file surfaces as an error instead of data loss.

use serde::{de::DeserializeOwned, Serialize};

pub mod errors;
pub mod campaign;
pub mod keyword;

pub use campaign::{Campaign, CampaignDetails, CampaignId, CampaignInput};
pub use keyword::{Keyword, KeywordId, KeywordInput, KeywordState, MatchType};

/// A record stored in one of the flat JSON collections.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection name, used for logging and id sequences.
    const COLLECTION: &'static str;

    fn id(&self) -> u64;
}

/// Key used for case-insensitive uniqueness checks.
pub fn unique_key(value: &str) -> String {
    value.trim().to_lowercase()
}

pub(crate) fn require_text(field: &str, value: &str) -> Result<String, errors::ModelError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(errors::ModelError::Validation(format!("{field} required")));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn require_amount(field: &str, value: f64) -> Result<f64, errors::ModelError> {
    if !value.is_finite() || value < 0.0 {
        return Err(errors::ModelError::Validation(format!(
            "{field} must be a non-negative number"
        )));
    }
    Ok(value)
}
