use std::{collections::HashSet, sync::Arc};

use configs::OrphanPolicy;
use models::{unique_key, CampaignId, Keyword, KeywordId, KeywordInput};
use tracing::{info, instrument, warn};

use crate::errors::ServiceError;
use crate::repository::Repository;

/// Keyword rules: text unique per campaign, ids unique across campaigns.
#[derive(Clone)]
pub struct KeywordService {
    repo: Arc<Repository>,
    orphans: OrphanPolicy,
}

impl KeywordService {
    pub fn new(repo: Arc<Repository>, orphans: OrphanPolicy) -> Self {
        Self { repo, orphans }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Keyword>, ServiceError> {
        let _guard = self.repo.lock().await;
        self.repo.keywords().load().await
    }

    #[instrument(skip(self))]
    pub async fn list_for_campaign(&self, campaign_id: CampaignId) -> Result<Vec<Keyword>, ServiceError> {
        let _guard = self.repo.lock().await;
        let keywords = self.repo.keywords().load().await?;
        Ok(keywords.into_iter().filter(|k| k.campaign_id == campaign_id).collect())
    }

    #[instrument(skip(self))]
    pub async fn add(&self, campaign_id: CampaignId, input: KeywordInput) -> Result<Keyword, ServiceError> {
        let input = input.validate()?;
        let _guard = self.repo.lock().await;

        let campaign_exists = self
            .repo
            .campaigns()
            .load()
            .await?
            .iter()
            .any(|c| c.id == campaign_id);
        if !campaign_exists {
            match self.orphans {
                OrphanPolicy::Reject => return Err(ServiceError::not_found("campaign", campaign_id)),
                OrphanPolicy::Tolerate => warn!(campaign_id, "adding keyword to unknown campaign"),
            }
        }

        let mut keywords = self.repo.keywords().load().await?;
        let key = unique_key(&input.text);
        if keywords
            .iter()
            .any(|k| k.campaign_id == campaign_id && unique_key(&k.text) == key)
        {
            warn!(campaign_id, text = %input.text, "rejected duplicate keyword text");
            return Err(ServiceError::DuplicateText { campaign_id, text: input.text });
        }

        let keyword = Keyword {
            id: self.repo.next_id(&keywords).await?,
            campaign_id,
            text: input.text,
            bid: input.bid,
            match_type: input.match_type,
            state: input.state,
        };
        keywords.push(keyword.clone());
        self.repo.keywords().save(&keywords).await?;

        info!(id = keyword.id, campaign_id, text = %keyword.text, "created keyword");
        Ok(keyword)
    }

    /// Returns whether a keyword was removed; unknown ids are not an error.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: KeywordId) -> Result<bool, ServiceError> {
        let _guard = self.repo.lock().await;

        let mut keywords = self.repo.keywords().load().await?;
        let before = keywords.len();
        keywords.retain(|k| k.id != id);
        if keywords.len() == before {
            return Ok(false);
        }

        self.repo.keywords().save(&keywords).await?;
        info!(id, "deleted keyword");
        Ok(true)
    }

    /// Drop keywords whose campaign no longer exists. Returns how many were removed.
    #[instrument(skip(self))]
    pub async fn reconcile_orphans(&self) -> Result<usize, ServiceError> {
        let _guard = self.repo.lock().await;

        let campaign_ids: HashSet<CampaignId> =
            self.repo.campaigns().load().await?.iter().map(|c| c.id).collect();
        let mut keywords = self.repo.keywords().load().await?;
        let before = keywords.len();
        keywords.retain(|k| campaign_ids.contains(&k.campaign_id));
        let removed = before - keywords.len();

        if removed > 0 {
            self.repo.keywords().save(&keywords).await?;
            warn!(removed, "removed orphaned keywords");
        }
        Ok(removed)
    }
}
