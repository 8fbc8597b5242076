use std::{env, net::SocketAddr, path::Path};

use axum::Router;
use configs::{AppConfig, StorageConfig};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes::{self, AppState};
use service::{runtime, CampaignService, KeywordService, Repository};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load config from `CONFIG_PATH` (default `config.toml`), or from env vars
/// when that file does not exist. A file that exists but fails to parse is
/// an error.
pub fn load_config() -> Result<AppConfig, StartupError> {
    let path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    let mut cfg = if Path::new(&path).exists() {
        configs::load_from_file(&path).map_err(|e| StartupError::InvalidConfig(format!("{path}: {e}")))?
    } else {
        AppConfig::from_env()
    };
    cfg.normalize_and_validate()
        .map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    Ok(cfg)
}

/// Open the collections and wire up both services.
pub async fn build_state(storage: &StorageConfig) -> anyhow::Result<AppState> {
    let repo = Repository::open(storage).await?;
    let keywords = KeywordService::new(repo.clone(), storage.orphan_policy);
    if storage.reconcile_on_startup {
        let removed = keywords.reconcile_orphans().await?;
        if removed > 0 {
            warn!(removed, "startup reconciliation removed orphaned keywords");
        }
    }
    Ok(AppState { campaigns: CampaignService::new(repo), keywords })
}

/// Public entry: build the app and run the HTTP server
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    runtime::ensure_env(&cfg.storage.data_dir)
        .await
        .map_err(|e| StartupError::Runtime(e.to_string()))?;

    let state = build_state(&cfg.storage).await?;
    let app: Router = routes::build_router(state, build_cors());

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address: {e}")))?;
    info!(%addr, orphan_policy = ?cfg.storage.orphan_policy, "starting campaign server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
