use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::keyword::Keyword;
use crate::{require_amount, require_text, Record};

pub type CampaignId = u64;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Campaign {
    pub id: CampaignId,
    pub name: String,
    pub daily_budget: f64,
}

impl Record for Campaign {
    const COLLECTION: &'static str = "campaigns";

    fn id(&self) -> u64 {
        self.id
    }
}

/// Mutable fields of a campaign, as submitted by a caller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CampaignInput {
    pub name: String,
    pub daily_budget: f64,
}

impl CampaignInput {
    pub fn new(name: impl Into<String>, daily_budget: f64) -> Self {
        Self { name: name.into(), daily_budget }
    }

    /// Returns the input with the name trimmed, or a validation error.
    pub fn validate(self) -> Result<Self, ModelError> {
        Ok(Self {
            name: require_text("name", &self.name)?,
            daily_budget: require_amount("daily_budget", self.daily_budget)?,
        })
    }
}

/// A campaign joined with its keywords in insertion order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CampaignDetails {
    #[serde(flatten)]
    pub campaign: Campaign,
    pub keywords: Vec<Keyword>,
}
