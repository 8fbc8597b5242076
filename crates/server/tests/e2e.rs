use std::net::SocketAddr;

use axum::Router;
use configs::{OrphanPolicy, StorageConfig};
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use server::{routes, startup};

struct TestApp {
    base_url: String,
    data_dir: String,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.data_dir);
    }
}

async fn start_server(policy: OrphanPolicy) -> anyhow::Result<TestApp> {
    // isolated data dir per test
    let data_dir = format!("target/test-data/{}", Uuid::new_v4());
    let storage = StorageConfig { data_dir: data_dir.clone(), orphan_policy: policy, ..StorageConfig::default() };
    let state = startup::build_state(&storage).await?;

    let app: Router = routes::build_router(state, CorsLayer::very_permissive());
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url, data_dir })
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    let app = start_server(OrphanPolicy::Reject).await?;
    let res = reqwest::get(format!("{}/health", app.base_url)).await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn e2e_campaign_lifecycle() -> anyhow::Result<()> {
    let app = start_server(OrphanPolicy::Reject).await?;
    let c = reqwest::Client::new();

    let res = c.post(format!("{}/campaigns", app.base_url))
        .json(&json!({"name": "Spring Sale", "daily_budget": 50.0}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    assert_eq!(res.json::<Value>().await?, json!({"id": 1, "name": "Spring Sale", "daily_budget": 50.0}));

    // duplicate in other case -> 409
    let res = c.post(format!("{}/campaigns", app.base_url))
        .json(&json!({"name": "spring sale", "daily_budget": 10.0}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::CONFLICT);
    assert_eq!(res.json::<Value>().await?["error"], "Conflict");

    let res = c.put(format!("{}/campaigns/1", app.base_url))
        .json(&json!({"name": "Spring Sale", "daily_budget": 75.0}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?["daily_budget"], 75.0);

    let list = c.get(format!("{}/campaigns", app.base_url)).send().await?.json::<Value>().await?;
    assert_eq!(list, json!([{"id": 1, "name": "Spring Sale", "daily_budget": 75.0}]));

    let res = c.post(format!("{}/campaigns", app.base_url))
        .json(&json!({"name": "  ", "daily_budget": 1.0}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn e2e_keywords_and_cascade_delete() -> anyhow::Result<()> {
    let app = start_server(OrphanPolicy::Reject).await?;
    let c = reqwest::Client::new();

    c.post(format!("{}/campaigns", app.base_url))
        .json(&json!({"name": "Spring Sale", "daily_budget": 50.0}))
        .send().await?;
    for text in ["shoes", "boots"] {
        let res = c.post(format!("{}/campaigns/1/keywords", app.base_url))
            .json(&json!({"text": text, "bid": 0.5, "match_type": "exact"}))
            .send().await?;
        assert_eq!(res.status(), HttpStatusCode::CREATED);
    }

    let res = c.post(format!("{}/campaigns/1/keywords", app.base_url))
        .json(&json!({"text": "SHOES", "bid": 0.5, "match_type": "broad", "state": "disabled"}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::CONFLICT);

    // unknown campaign -> 404 under the reject policy
    let res = c.post(format!("{}/campaigns/9/keywords", app.base_url))
        .json(&json!({"text": "ghost", "bid": 0.5, "match_type": "phrase"}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);

    let details = c.get(format!("{}/campaigns/1", app.base_url)).send().await?.json::<Value>().await?;
    assert_eq!(details["name"], "Spring Sale");
    assert_eq!(details["keywords"][0]["text"], "shoes");
    assert_eq!(details["keywords"][0]["state"], "enabled");
    assert_eq!(details["keywords"][1]["id"], 2);

    let res = c.delete(format!("{}/campaigns/1", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NO_CONTENT);
    let res = c.delete(format!("{}/campaigns/1", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NO_CONTENT);

    let res = c.get(format!("{}/campaigns/1", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    let keywords = c.get(format!("{}/keywords", app.base_url)).send().await?.json::<Value>().await?;
    assert_eq!(keywords, json!([]));
    Ok(())
}

#[tokio::test]
async fn e2e_delete_single_keyword() -> anyhow::Result<()> {
    let app = start_server(OrphanPolicy::Tolerate).await?;
    let c = reqwest::Client::new();

    c.post(format!("{}/campaigns", app.base_url))
        .json(&json!({"name": "Winter", "daily_budget": 20.0}))
        .send().await?;
    c.post(format!("{}/campaigns/1/keywords", app.base_url))
        .json(&json!({"text": "scarf", "bid": 1.0, "match_type": "broad"}))
        .send().await?;

    let res = c.delete(format!("{}/keywords/1", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NO_CONTENT);
    let remaining = c.get(format!("{}/campaigns/1/keywords", app.base_url)).send().await?.json::<Value>().await?;
    assert_eq!(remaining, json!([]));
    Ok(())
}
