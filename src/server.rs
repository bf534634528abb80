use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use geojson::FeatureCollection;
use serde::Deserialize;
use tower_http::cors::CorsLayer;

use crate::aggregate::{compute_hotspots, to_feature_collection};
use crate::config::AppConfig;
use crate::types::Dataset;

pub struct AppState {
    pub config: AppConfig,
    pub client: reqwest::Client,
}

#[derive(Deserialize)]
pub struct HotspotParams {
    dataset: String,
}

pub async fn start_server(config: AppConfig) -> Result<()> {
    let port = config.server.port;
    let state = Arc::new(AppState {
        config,
        client: reqwest::Client::new(),
    });

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    println!("Starting server on http://{}", addr);

    let app = Router::new()
        .route("/api/hotspots", get(hotspots_handler))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Each request runs its own fetch-then-aggregate pass; there is no shared
/// mutable state, so a newer request simply supersedes an older one on the
/// consuming map layer.
async fn hotspots_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HotspotParams>,
) -> Result<Json<FeatureCollection>, (StatusCode, String)> {
    // Unknown dataset tokens are a caller bug; reject rather than default.
    let dataset = Dataset::from_str(&params.dataset)
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let hotspots = compute_hotspots(&state.client, &state.config, dataset).await;
    Ok(Json(to_feature_collection(&hotspots)))
}
