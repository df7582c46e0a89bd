use axum::{Json, extract::State, http::StatusCode};

use shelf_core::{
    api_types::{LibraryInput, LibraryPatch},
    model::{Library, LibraryId},
};

use crate::{
    AppState,
    infra::{errors::AppResult, extract::{ApiJson, ApiPath}},
};

pub async fn list_libraries(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Library>>> {
    Ok(Json(state.catalog.list_libraries().await?))
}

pub async fn create_library(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<LibraryInput>,
) -> AppResult<(StatusCode, Json<Library>)> {
    let library = state.catalog.create_library(input).await?;
    Ok((StatusCode::CREATED, Json(library)))
}

pub async fn get_library(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<LibraryId>,
) -> AppResult<Json<Library>> {
    Ok(Json(state.catalog.get_library(id).await?))
}

pub async fn update_library(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<LibraryId>,
    ApiJson(input): ApiJson<LibraryInput>,
) -> AppResult<Json<Library>> {
    Ok(Json(state.catalog.update_library(id, input).await?))
}

pub async fn patch_library(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<LibraryId>,
    ApiJson(patch): ApiJson<LibraryPatch>,
) -> AppResult<Json<Library>> {
    Ok(Json(state.catalog.patch_library(id, patch).await?))
}

/// Removes the library with its books, members and their loan history.
pub async fn delete_library(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<LibraryId>,
) -> AppResult<StatusCode> {
    state.catalog.delete_library(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
