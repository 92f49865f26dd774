//! Domain route groups. Every group here sits behind the session gate.

use crate::auth::credit_middleware;
use crate::constants::API_PREFIX;
use crate::handlers;
use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

/// Image generation; each call spends one credit.
pub fn generation_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/redesign-room", API_PREFIX),
            post(handlers::redesign::redesign_room),
        )
        .route(
            &format!("{}/enhance-image", API_PREFIX),
            post(handlers::enhance::enhance_image),
        )
        .route_layer(axum::middleware::from_fn_with_state(state, credit_middleware))
}

pub fn social_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/social/caption", API_PREFIX),
            post(handlers::social::generate_caption),
        )
        .route(
            &format!("{}/social/publish", API_PREFIX),
            post(handlers::social::publish_post),
        )
        .route(
            &format!("{}/social/video", API_PREFIX),
            post(handlers::social::plan_slideshow),
        )
}

pub fn payment_routes() -> Router<Arc<AppState>> {
    Router::new().route(
        &format!("{}/payments/charge", API_PREFIX),
        post(handlers::payments::create_charge),
    )
}

pub fn upload_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/upload-image", API_PREFIX),
            post(handlers::uploads::upload_image),
        )
        .route(
            &format!("{}/upload-video", API_PREFIX),
            post(handlers::uploads::upload_video),
        )
}

/// Dashboard, visits and speech.
pub fn workspace_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/dashboard/metrics", API_PREFIX),
            get(handlers::metrics::dashboard_metrics),
        )
        .route(
            &format!("{}/visits", API_PREFIX),
            post(handlers::visits::schedule_visit),
        )
        .route(
            &format!("{}/tts", API_PREFIX),
            post(handlers::tts::synthesize_speech),
        )
}
