use axum::{Json, extract::State};

use shelf_core::model::LibraryStatistics;

use crate::{AppState, infra::errors::AppResult};

pub async fn statistics(
    State(state): State<AppState>,
) -> AppResult<Json<LibraryStatistics>> {
    Ok(Json(state.discovery.statistics().await?))
}
