//! HTTP API over the position store

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use log::info;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use crate::{CanonicalPosition, GeoTrack, PositionStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<PositionStore>,
    pub track: Arc<GeoTrack>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/latest-data", get(latest_data))
        .route("/api/status", get(status))
        .route("/api/dummy", get(dummy))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve the API until `shutdown` resolves
pub async fn serve<F>(addr: SocketAddr, state: AppState, shutdown: F) -> Result<(), String>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed on bind {}: {}", addr, e.to_string()))?;

    info!("API listening on http://{}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| format!("Failed on serve the API: {}", e.to_string()))
}

/// `GET /api/latest-data`
async fn latest_data(
    State(state): State<AppState>,
) -> Result<Json<CanonicalPosition>, (StatusCode, Json<Value>)> {
    match state.store.get() {
        Some(pos) => Ok(Json(pos)),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "No device data available yet." })),
        )),
    }
}

/// `GET /api/status`
async fn status(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": state.store.status().label(),
        "hasData": state.store.has_data(),
    }))
}

/// `GET /api/dummy`, the playback track as GeoJSON
async fn dummy(State(state): State<AppState>) -> Json<Value> {
    Json(state.track.to_geojson())
}
