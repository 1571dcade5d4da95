//! Upload notification endpoints.
//!
//! Bodies arrive either as the bare Cloud Storage object resource (Eventarc, direct
//! HTTP) or wrapped in a Pub/Sub push envelope whose `message.data` is the base64
//! encoded object resource.

use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{body::Bytes, extract::State, http::StatusCode};
use base64::Engine;
use mediaguard_core::{AppError, MediaKind, UploadEvent};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct PushEnvelope {
    message: PushMessage,
    #[serde(default)]
    subscription: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PushMessage {
    #[serde(default)]
    data: Option<String>,
    #[serde(default)]
    attributes: HashMap<String, String>,
    #[serde(default)]
    message_id: Option<String>,
}

/// Extract the upload event from a request body.
pub fn decode_event(body: &[u8]) -> Result<UploadEvent, AppError> {
    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| AppError::InvalidInput(format!("Body is not JSON: {}", e)))?;

    if value.get("message").is_some_and(|m| m.is_object()) {
        let envelope: PushEnvelope = serde_json::from_value(value)
            .map_err(|e| AppError::InvalidInput(format!("Invalid push envelope: {}", e)))?;
        return decode_push_message(envelope);
    }

    serde_json::from_value(value)
        .map_err(|e| AppError::InvalidInput(format!("Invalid storage object: {}", e)))
}

fn decode_push_message(envelope: PushEnvelope) -> Result<UploadEvent, AppError> {
    let PushEnvelope {
        message,
        subscription,
    } = envelope;

    let data = message
        .data
        .ok_or_else(|| AppError::InvalidInput("Push message has no data".to_string()))?;
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(data.trim())
        .map_err(|e| AppError::InvalidInput(format!("Push message data is not base64: {}", e)))?;

    tracing::debug!(
        message_id = message.message_id.as_deref().unwrap_or("-"),
        subscription = subscription.as_deref().unwrap_or("-"),
        event_type = message.attributes.get("eventType").map(String::as_str).unwrap_or("-"),
        "Decoded push envelope"
    );

    serde_json::from_slice(&decoded)
        .map_err(|e| AppError::InvalidInput(format!("Invalid storage object in push data: {}", e)))
}

async fn handle_event(
    state: Arc<AppState>,
    kind: MediaKind,
    body: Bytes,
) -> Result<StatusCode, HttpAppError> {
    let expose_details = !state.config.is_production();
    let event = decode_event(&body)
        .map_err(|e| HttpAppError::from(e).with_details(expose_details))?;
    state
        .dispatcher
        .handle(kind, &event)
        .await
        .map_err(|e| HttpAppError::from(e).with_details(expose_details))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Notification from the image upload trigger
pub async fn image_event(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<StatusCode, HttpAppError> {
    handle_event(state, MediaKind::Image, body).await
}

/// Notification from the video upload trigger
pub async fn video_event(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<StatusCode, HttpAppError> {
    handle_event(state, MediaKind::Video, body).await
}
