use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use bindery_model::BookDetails;

use crate::infra::{app_state::AppState, errors::AppResult};

#[derive(Debug, Deserialize, Default)]
pub struct BookListParams {
    /// Free-text title search; blank or absent returns the full listing.
    pub q: Option<String>,
}

/// Listing/search view over available books, title ascending.
pub async fn list_books_handler(
    State(state): State<AppState>,
    Query(params): Query<BookListParams>,
) -> AppResult<Json<Vec<BookDetails>>> {
    let books = state.storefront.search(params.q.as_deref()).await?;
    Ok(Json(books))
}
