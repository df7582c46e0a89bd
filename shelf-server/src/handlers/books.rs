use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};

use shelf_core::{
    api_types::{BookInput, BookPatch, BookView, SearchQuery},
    model::{AvailabilityReport, BookId},
};

use crate::{
    AppState,
    infra::{errors::AppResult, extract::{ApiJson, ApiPath}},
};

pub async fn list_books(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<BookView>>> {
    let books = state.catalog.list_books().await?;
    Ok(Json(state.catalog.book_views(books).await?))
}

pub async fn create_book(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<BookInput>,
) -> AppResult<(StatusCode, Json<BookView>)> {
    let book = state.catalog.create_book(input).await?;
    let view = state.catalog.book_view(book).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn get_book(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<BookId>,
) -> AppResult<Json<BookView>> {
    let book = state.catalog.get_book(id).await?;
    Ok(Json(state.catalog.book_view(book).await?))
}

pub async fn update_book(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<BookId>,
    ApiJson(input): ApiJson<BookInput>,
) -> AppResult<Json<BookView>> {
    let book = state.catalog.update_book(id, input).await?;
    Ok(Json(state.catalog.book_view(book).await?))
}

pub async fn patch_book(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<BookId>,
    ApiJson(patch): ApiJson<BookPatch>,
) -> AppResult<Json<BookView>> {
    let book = state.catalog.patch_book(id, patch).await?;
    Ok(Json(state.catalog.book_view(book).await?))
}

pub async fn delete_book(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<BookId>,
) -> AppResult<StatusCode> {
    state.catalog.delete_book(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/books/search/?q=`; `q` is matched untrimmed, and a missing or
/// empty `q` lists every book.
pub async fn search_books(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<BookView>>> {
    let books = state.discovery.search_books(&query.q).await?;
    Ok(Json(state.catalog.book_views(books).await?))
}

pub async fn book_availability(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<BookId>,
) -> AppResult<Json<AvailabilityReport>> {
    Ok(Json(state.circulation.availability(id).await?))
}
