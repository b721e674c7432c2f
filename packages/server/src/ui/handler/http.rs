//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use serde_json::Value;

use crate::{
    infrastructure::dto::{
        conversion::screen_entry_to_dto,
        http::{ConnectionDetailDto, ScreenDetailDto, StatusDto, TopologyDto},
    },
    ui::state::AppState,
    usecase::CatalogError,
};
use seedwall_shared::time::timestamp_to_rfc3339;

/// Health check endpoint
pub async fn health_check() -> Json<StatusDto> {
    Json(StatusDto::ok())
}

/// Get the whole catalog document
pub async fn get_presets(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, (StatusCode, Json<StatusDto>)> {
    match state.catalog_usecase.get().await {
        Ok(catalog) => Ok(Json(catalog.into_value())),
        Err(e) => {
            tracing::error!("Failed to load catalog: {}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, Json(StatusDto::error())))
        }
    }
}

/// Replace the whole catalog document and notify every connection
pub async fn post_presets(
    State(state): State<Arc<AppState>>,
    Json(document): Json<Value>,
) -> (StatusCode, Json<StatusDto>) {
    match state.catalog_usecase.replace(document).await {
        Ok(_) => (StatusCode::OK, Json(StatusDto::ok())),
        Err(CatalogError::InvalidDocument(e)) => {
            tracing::warn!("Rejected catalog document: {}", e);
            (StatusCode::BAD_REQUEST, Json(StatusDto::error()))
        }
        Err(e) => {
            tracing::error!("Failed to save catalog: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(StatusDto::error()))
        }
    }
}

/// Debug endpoint to get the current topology
pub async fn get_topology(State(state): State<Arc<AppState>>) -> Json<TopologyDto> {
    let snapshot = state.get_topology_usecase.execute().await;

    // Domain Model から DTO への変換
    let screens = snapshot
        .screens
        .iter()
        .map(|entry| {
            let (screen_number, members) = screen_entry_to_dto(entry);
            ScreenDetailDto {
                screen_number,
                members,
            }
        })
        .collect();
    let connections = snapshot
        .connections
        .iter()
        .map(|connection| ConnectionDetailDto {
            client_id: connection.id.as_str().to_string(),
            role: connection.role.to_string(),
            screen_number: connection.screen.map(|screen| screen.value()),
            connected_at: timestamp_to_rfc3339(connection.connected_at.value()),
            last_seen: timestamp_to_rfc3339(connection.last_seen.value()),
        })
        .collect();

    Json(TopologyDto {
        peers_count: snapshot.counts.peers,
        registered_screens: snapshot.counts.screens,
        seed: snapshot.seed.map(|id| id.into_string()),
        current_preset: snapshot.current_preset,
        screens,
        connections,
    })
}
