use axum::{Router, routing::get};

use crate::{
    handlers::{books, home},
    infra::app_state::AppState,
};

/// Create all v1 API routes.
///
/// The public surface is deliberately small: the two read-only
/// storefront endpoints. Administrative actions go through the core
/// services, not HTTP.
pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route("/home", get(home::home_handler))
        .route("/books", get(books::list_books_handler))
}
