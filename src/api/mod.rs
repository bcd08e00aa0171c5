//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers, the locale proxy and
//! response structures.

pub mod handlers;
pub mod middleware;
pub mod responses;

use std::sync::Arc;
use axum::{
    middleware::from_fn_with_state,
    routing::get,
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    // Page routes sit behind the locale proxy; API routes do not
    let pages = Router::new()
        .route("/", get(page_handler))
        .route("/*path", get(page_handler))
        .layer(from_fn_with_state(Arc::clone(&state), middleware::locale_proxy));

    Router::new()
        .route(
            "/api/sessions/:session_id/delay",
            get(poll_delay_handler)
                .post(start_delay_handler)
                .delete(clear_delay_handler),
        )
        .route("/sitemap.xml", get(sitemap_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .merge(pages)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
