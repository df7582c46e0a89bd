use axum::{Json, extract::State, http::StatusCode};

use shelf_core::{
    api_types::{ReviewInput, ReviewPatch, ReviewUpdate, ReviewView},
    model::ReviewId,
};

use crate::{
    AppState,
    infra::{errors::AppResult, extract::{ApiJson, ApiPath}},
};

pub async fn list_reviews(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ReviewView>>> {
    let reviews = state.patrons.list_reviews().await?;
    Ok(Json(state.patrons.review_views(reviews).await?))
}

pub async fn create_review(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<ReviewInput>,
) -> AppResult<(StatusCode, Json<ReviewView>)> {
    let review = state.patrons.create_review(input).await?;
    let view = state.patrons.review_view(review).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn get_review(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ReviewId>,
) -> AppResult<Json<ReviewView>> {
    let review = state.patrons.get_review(id).await?;
    Ok(Json(state.patrons.review_view(review).await?))
}

pub async fn update_review(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ReviewId>,
    ApiJson(update): ApiJson<ReviewUpdate>,
) -> AppResult<Json<ReviewView>> {
    let review = state.patrons.update_review(id, update).await?;
    Ok(Json(state.patrons.review_view(review).await?))
}

pub async fn patch_review(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ReviewId>,
    ApiJson(patch): ApiJson<ReviewPatch>,
) -> AppResult<Json<ReviewView>> {
    let review = state.patrons.patch_review(id, patch).await?;
    Ok(Json(state.patrons.review_view(review).await?))
}

pub async fn delete_review(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ReviewId>,
) -> AppResult<StatusCode> {
    state.patrons.delete_review(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
