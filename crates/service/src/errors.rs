use std::fmt::Display;

use models::{errors::ModelError, CampaignId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("campaign name already in use: {0}")]
    DuplicateName(String),
    #[error("keyword `{text}` already exists in campaign {campaign_id}")]
    DuplicateText { campaign_id: CampaignId, text: String },
    #[error("storage error: {0}")]
    Storage(String),
}

impl ServiceError {
    pub fn not_found(entity: &str, id: u64) -> Self { Self::NotFound(format!("{} {} not found", entity, id)) }

    pub fn storage(context: impl Display, err: impl Display) -> Self {
        Self::Storage(format!("{}: {}", context, err))
    }
}

impl From<ModelError> for ServiceError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::Validation(msg) => Self::Validation(msg),
        }
    }
}
