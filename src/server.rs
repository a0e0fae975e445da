use crate::config::AppConfig;
use crate::classify::fill_color;
use crate::hit::HitIndex;
use crate::index::RegionIndex;
use crate::ranking::{compute_stats, ranking_rows, search, RankingRow, RegionStats};
use crate::types::{ColorMode, SortKey};
use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

pub struct AppState {
    pub index: RegionIndex,
    pub hits: HitIndex,
}

impl AppState {
    pub fn new(index: RegionIndex) -> Self {
        let hits = HitIndex::build(index.regions());
        Self { index, hits }
    }
}

#[derive(Deserialize)]
pub struct RankingParams {
    #[serde(default)]
    sort: SortKey,
}

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    q: String,
}

#[derive(Deserialize)]
pub struct ColorParams {
    #[serde(default)]
    mode: ColorMode,
}

#[derive(Deserialize)]
pub struct PointParams {
    lat: f64,
    lon: f64,
}

#[derive(Serialize)]
pub struct RegionAt {
    name: String,
}

pub fn router(state: Arc<AppState>, static_dir: &Path) -> Router {
    Router::new()
        .route("/api/geojson", get(geojson_handler))
        .route("/api/stats", get(stats_handler))
        .route("/api/rankings", get(rankings_handler))
        .route("/api/search", get(search_handler))
        .route("/api/colors", get(colors_handler))
        .route("/api/region-at", get(region_at_handler))
        .fallback_service(ServeDir::new(static_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(config: AppConfig, index: RegionIndex) -> Result<()> {
    let state = Arc::new(AppState::new(index));
    info!(regions = state.index.regions().len(), hit_boxes = state.hits.len(), "Spatial index built");

    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Server running at http://{}", addr);

    let app = router(state, &config.server.static_dir);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

async fn geojson_handler(State(state): State<Arc<AppState>>) -> Response {
    Json(state.index.store().collection()).into_response()
}

async fn stats_handler(State(state): State<Arc<AppState>>) -> Json<RegionStats> {
    Json(compute_stats(state.index.regions()))
}

async fn rankings_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RankingParams>,
) -> Json<Vec<RankingRow>> {
    Json(ranking_rows(state.index.regions(), params.sort))
}

async fn search_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Json<Vec<String>> {
    let names = search(state.index.regions(), &params.q)
        .into_iter()
        .map(|r| r.name.clone())
        .collect();
    Json(names)
}

async fn colors_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ColorParams>,
) -> Json<BTreeMap<String, &'static str>> {
    let colors = state
        .index
        .regions()
        .iter()
        .map(|r| (r.name.clone(), fill_color(r, params.mode)))
        .collect();
    Json(colors)
}

async fn region_at_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PointParams>,
) -> Json<Option<RegionAt>> {
    let regions = state.index.regions();
    let hit = state
        .hits
        .locate(regions, params.lon, params.lat)
        .map(|position| RegionAt { name: regions[position].name.clone() });
    Json(hit)
}
