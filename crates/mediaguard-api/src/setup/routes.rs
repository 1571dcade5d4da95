use crate::constants::{HEALTH_PATH, IMAGE_EVENTS_PATH, MAX_EVENT_BODY_BYTES, VIDEO_EVENTS_PATH};
use crate::handlers::{events, health};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use mediaguard_core::Config;
use std::sync::Arc;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Router<()> {
    let concurrency_limit = config.max_concurrent_events().max(1);
    let request_timeout = config.request_timeout();
    tracing::info!(
        concurrency_limit,
        request_timeout_secs = request_timeout.as_secs(),
        "Event handling limits configured"
    );

    // One semaphore shared by both trigger routes
    let event_routes = Router::new()
        .route(IMAGE_EVENTS_PATH, post(events::image_event))
        .route(VIDEO_EVENTS_PATH, post(events::video_event))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(GlobalConcurrencyLimitLayer::new(concurrency_limit));

    Router::new()
        .route(HEALTH_PATH, get(health::health_check))
        .merge(event_routes)
        .layer(RequestBodyLimitLayer::new(MAX_EVENT_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
