//! Maps the form pages to their handlers.

use crate::web::handlers::{
    analytics_page, analytics_submit, campaign_page, campaign_submit, index,
};
use crate::web::state::{AppState, SharedState};
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn build_router(state: AppState) -> Router {
    let shared: SharedState = Arc::new(state);

    Router::new()
        .route("/", get(index))
        .route("/analytics", get(analytics_page).post(analytics_submit))
        .route("/campaign", get(campaign_page).post(campaign_submit))
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}
