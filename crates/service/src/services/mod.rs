pub mod campaign_service;
pub mod keyword_service;

pub use campaign_service::{CampaignService, DeleteOutcome};
pub use keyword_service::KeywordService;
