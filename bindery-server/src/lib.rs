//! HTTP layer for the Bindery bookstore platform.
//!
//! Thin Axum surface over `bindery-core`: two public read-only
//! storefront endpoints plus the wiring (state, config, errors) they
//! need. Query semantics live in the core; handlers only translate
//! between HTTP and the storefront service.

pub mod handlers;
pub mod infra;
pub mod routes;

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::infra::app_state::AppState;

/// Assemble the full application router with its middleware stack.
pub fn build_router(state: AppState) -> Router {
    routes::create_api_router()
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
