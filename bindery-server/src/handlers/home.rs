use axum::{Json, extract::State};
use bindery_core::HomePage;

use crate::infra::{app_state::AppState, errors::AppResult};

/// Home/dashboard view: catalog totals plus the three capped shelves.
pub async fn home_handler(
    State(state): State<AppState>,
) -> AppResult<Json<HomePage>> {
    let home = state.storefront.home().await?;
    Ok(Json(home))
}
