use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use models::{CampaignId, Keyword, KeywordId, KeywordInput};

use super::AppState;
use crate::errors::ApiError;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Keyword>>, ApiError> {
    Ok(Json(state.keywords.list().await?))
}

pub async fn list_for_campaign(
    State(state): State<AppState>,
    Path(campaign_id): Path<CampaignId>,
) -> Result<Json<Vec<Keyword>>, ApiError> {
    Ok(Json(state.keywords.list_for_campaign(campaign_id).await?))
}

/// Attach a keyword to the campaign in the path
pub async fn create(
    State(state): State<AppState>,
    Path(campaign_id): Path<CampaignId>,
    Json(input): Json<KeywordInput>,
) -> Result<(StatusCode, Json<Keyword>), ApiError> {
    let keyword = state.keywords.add(campaign_id, input).await?;
    Ok((StatusCode::CREATED, Json(keyword)))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<KeywordId>,
) -> Result<StatusCode, ApiError> {
    state.keywords.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
