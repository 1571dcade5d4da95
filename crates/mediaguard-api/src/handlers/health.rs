//! Health check handler.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use mediaguard_core::MediaKind;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    pub status: &'static str,
    pub environment: String,
    pub storage: String,
    /// Warm instances the deployment should keep for this environment
    pub min_instances: u32,
    pub placeholders: PlaceholderKeys,
}

#[derive(Debug, Serialize)]
pub struct PlaceholderKeys {
    pub image: String,
    pub video: String,
}

/// Liveness probe. Does not touch the object store or any vendor API.
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthCheckResponse {
            status: "healthy",
            environment: state.config.environment().to_string(),
            storage: state.storage.backend_type().to_string(),
            min_instances: state.config.min_instances(),
            placeholders: PlaceholderKeys {
                image: state.config.placeholder(MediaKind::Image).key.clone(),
                video: state.config.placeholder(MediaKind::Video).key.clone(),
            },
        }),
    )
}
