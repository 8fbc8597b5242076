use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use models::{Campaign, CampaignDetails, CampaignId, CampaignInput};
use tracing::info;

use super::AppState;
use crate::errors::ApiError;

/// List all campaigns
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Campaign>>, ApiError> {
    let campaigns = state.campaigns.list().await?;
    Ok(Json(campaigns))
}

/// Create a campaign
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CampaignInput>,
) -> Result<(StatusCode, Json<Campaign>), ApiError> {
    let campaign = state.campaigns.add(input).await?;
    Ok((StatusCode::CREATED, Json(campaign)))
}

/// Campaign with its keywords
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<CampaignId>,
) -> Result<Json<CampaignDetails>, ApiError> {
    Ok(Json(state.campaigns.get_with_keywords(id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<CampaignId>,
    Json(input): Json<CampaignInput>,
) -> Result<Json<Campaign>, ApiError> {
    Ok(Json(state.campaigns.edit(id, input).await?))
}

/// Delete a campaign and its keywords; 204 whether or not it existed
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<CampaignId>,
) -> Result<StatusCode, ApiError> {
    let outcome = state.campaigns.delete(id).await?;
    if !outcome.campaign_removed {
        info!(id, "delete of absent campaign");
    }
    Ok(StatusCode::NO_CONTENT)
}
