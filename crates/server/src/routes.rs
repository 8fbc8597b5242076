use axum::{
    routing::{delete, get},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;
use service::{CampaignService, KeywordService};

pub mod campaigns;
pub mod keywords;

/// Services shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub campaigns: CampaignService,
    pub keywords: KeywordService,
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/campaigns", get(campaigns::list).post(campaigns::create))
        .route(
            "/campaigns/:id",
            get(campaigns::get).put(campaigns::update).delete(campaigns::delete),
        )
        .route(
            "/campaigns/:id/keywords",
            get(keywords::list_for_campaign).post(keywords::create),
        )
        .route("/keywords", get(keywords::list))
        .route("/keywords/:id", delete(keywords::delete))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx at ERROR
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
