use std::sync::Arc;

use models::{unique_key, Campaign, CampaignDetails, CampaignId, CampaignInput};
use tracing::{error, info, instrument, warn};

use crate::errors::ServiceError;
use crate::repository::Repository;

/// What a campaign delete actually removed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub campaign_removed: bool,
    pub keywords_removed: usize,
}

/// Campaign rules: case-insensitive unique names and the cascading delete.
#[derive(Clone)]
pub struct CampaignService {
    repo: Arc<Repository>,
}

impl CampaignService {
    pub fn new(repo: Arc<Repository>) -> Self {
        Self { repo }
    }

    /// All campaigns in insertion order.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Campaign>, ServiceError> {
        let _guard = self.repo.lock().await;
        self.repo.campaigns().load().await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: CampaignId) -> Result<Campaign, ServiceError> {
        let _guard = self.repo.lock().await;
        self.repo
            .campaigns()
            .load()
            .await?
            .into_iter()
            .find(|c| c.id == id)
            .ok_or_else(|| ServiceError::not_found("campaign", id))
    }

    #[instrument(skip(self))]
    pub async fn add(&self, input: CampaignInput) -> Result<Campaign, ServiceError> {
        let input = input.validate()?;
        let _guard = self.repo.lock().await;

        let mut campaigns = self.repo.campaigns().load().await?;
        let key = unique_key(&input.name);
        if campaigns.iter().any(|c| unique_key(&c.name) == key) {
            warn!(name = %input.name, "rejected duplicate campaign name");
            return Err(ServiceError::DuplicateName(input.name));
        }

        let campaign = Campaign {
            id: self.repo.next_id(&campaigns).await?,
            name: input.name,
            daily_budget: input.daily_budget,
        };
        campaigns.push(campaign.clone());
        self.repo.campaigns().save(&campaigns).await?;

        info!(id = campaign.id, name = %campaign.name, "created campaign");
        Ok(campaign)
    }

    /// Replace name and budget of an existing campaign; the id never changes.
    #[instrument(skip(self))]
    pub async fn edit(&self, id: CampaignId, input: CampaignInput) -> Result<Campaign, ServiceError> {
        let input = input.validate()?;
        let _guard = self.repo.lock().await;

        let mut campaigns = self.repo.campaigns().load().await?;
        let idx = campaigns
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| ServiceError::not_found("campaign", id))?;

        let key = unique_key(&input.name);
        if campaigns.iter().any(|c| c.id != id && unique_key(&c.name) == key) {
            warn!(id, name = %input.name, "rejected duplicate campaign name");
            return Err(ServiceError::DuplicateName(input.name));
        }

        let existing = &mut campaigns[idx];
        existing.name = input.name;
        existing.daily_budget = input.daily_budget;
        let updated = existing.clone();

        self.repo.campaigns().save(&campaigns).await?;
        info!(id, name = %updated.name, daily_budget = updated.daily_budget, "updated campaign");
        Ok(updated)
    }

    /// Remove a campaign and every keyword it owns. Deleting an unknown id is
    /// not an error.
    ///
    /// Campaigns are written first. If the keyword write then fails, the
    /// orphaned keywords stay on disk until `KeywordService::reconcile_orphans`
    /// sweeps them.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: CampaignId) -> Result<DeleteOutcome, ServiceError> {
        let _guard = self.repo.lock().await;

        let mut campaigns = self.repo.campaigns().load().await?;
        let mut keywords = self.repo.keywords().load().await?;

        let campaigns_before = campaigns.len();
        campaigns.retain(|c| c.id != id);
        let keywords_before = keywords.len();
        keywords.retain(|k| k.campaign_id != id);

        let outcome = DeleteOutcome {
            campaign_removed: campaigns.len() != campaigns_before,
            keywords_removed: keywords_before - keywords.len(),
        };

        if outcome.campaign_removed {
            self.repo.campaigns().save(&campaigns).await?;
        }
        if outcome.keywords_removed > 0 {
            if let Err(e) = self.repo.keywords().save(&keywords).await {
                let message = if outcome.campaign_removed {
                    "cascade delete incomplete: campaign removed but its keywords were not"
                } else {
                    "failed to remove keywords left over from an earlier campaign delete"
                };
                error!(
                    campaign_id = id,
                    campaign_removed = outcome.campaign_removed,
                    orphaned = outcome.keywords_removed,
                    error = %e,
                    "{message}"
                );
                return Err(e);
            }
        }

        if outcome.campaign_removed {
            info!(id, keywords_removed = outcome.keywords_removed, "deleted campaign");
        }
        Ok(outcome)
    }

    /// A campaign together with its keywords, in keyword insertion order.
    #[instrument(skip(self))]
    pub async fn get_with_keywords(&self, id: CampaignId) -> Result<CampaignDetails, ServiceError> {
        let _guard = self.repo.lock().await;

        let campaign = self
            .repo
            .campaigns()
            .load()
            .await?
            .into_iter()
            .find(|c| c.id == id)
            .ok_or_else(|| ServiceError::not_found("campaign", id))?;
        let keywords = self
            .repo
            .keywords()
            .load()
            .await?
            .into_iter()
            .filter(|k| k.campaign_id == id)
            .collect();

        Ok(CampaignDetails { campaign, keywords })
    }
}
