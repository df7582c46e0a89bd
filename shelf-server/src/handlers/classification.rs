use axum::{Json, extract::State, http::StatusCode};

use shelf_core::{
    api_types::{AuthorInput, AuthorPatch, CategoryInput, CategoryPatch},
    model::{Author, AuthorId, Category, CategoryId},
};

use crate::{
    AppState,
    infra::{errors::AppResult, extract::{ApiJson, ApiPath}},
};

pub async fn list_authors(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Author>>> {
    Ok(Json(state.catalog.list_authors().await?))
}

pub async fn create_author(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<AuthorInput>,
) -> AppResult<(StatusCode, Json<Author>)> {
    let author = state.catalog.create_author(input).await?;
    Ok((StatusCode::CREATED, Json(author)))
}

pub async fn get_author(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<AuthorId>,
) -> AppResult<Json<Author>> {
    Ok(Json(state.catalog.get_author(id).await?))
}

pub async fn update_author(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<AuthorId>,
    ApiJson(input): ApiJson<AuthorInput>,
) -> AppResult<Json<Author>> {
    Ok(Json(state.catalog.update_author(id, input).await?))
}

pub async fn patch_author(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<AuthorId>,
    ApiJson(patch): ApiJson<AuthorPatch>,
) -> AppResult<Json<Author>> {
    Ok(Json(state.catalog.patch_author(id, patch).await?))
}

pub async fn delete_author(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<AuthorId>,
) -> AppResult<StatusCode> {
    state.catalog.delete_author(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Category>>> {
    Ok(Json(state.catalog.list_categories().await?))
}

pub async fn create_category(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CategoryInput>,
) -> AppResult<(StatusCode, Json<Category>)> {
    let category = state.catalog.create_category(input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn get_category(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<CategoryId>,
) -> AppResult<Json<Category>> {
    Ok(Json(state.catalog.get_category(id).await?))
}

pub async fn update_category(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<CategoryId>,
    ApiJson(input): ApiJson<CategoryInput>,
) -> AppResult<Json<Category>> {
    Ok(Json(state.catalog.update_category(id, input).await?))
}

pub async fn patch_category(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<CategoryId>,
    ApiJson(patch): ApiJson<CategoryPatch>,
) -> AppResult<Json<Category>> {
    Ok(Json(state.catalog.patch_category(id, patch).await?))
}

pub async fn delete_category(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<CategoryId>,
) -> AppResult<StatusCode> {
    state.catalog.delete_category(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
