use axum::{Json, extract::State, http::StatusCode};

use shelf_core::{
    api_types::{
        BorrowRequest, BorrowingInput, BorrowingPatch, BorrowingUpdate,
        BorrowingView, ReturnRequest,
    },
    model::BorrowingId,
};

use crate::{
    AppState,
    infra::{errors::AppResult, extract::{ApiJson, ApiPath}},
};

/// `POST /api/books/borrow/`
pub async fn borrow_book(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<BorrowRequest>,
) -> AppResult<(StatusCode, Json<BorrowingView>)> {
    let borrowing = state
        .circulation
        .borrow_book(request.book_id, request.member_id, request.days)
        .await?;
    let view = state.circulation.borrowing_view(borrowing).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// `POST /api/books/return/`
pub async fn return_book(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ReturnRequest>,
) -> AppResult<Json<BorrowingView>> {
    let borrowing = state.circulation.return_book(request.borrowing_id).await?;
    Ok(Json(state.circulation.borrowing_view(borrowing).await?))
}

pub async fn list_borrowings(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<BorrowingView>>> {
    let borrowings = state.circulation.list_borrowings().await?;
    Ok(Json(state.circulation.borrowing_views(borrowings).await?))
}

pub async fn create_borrowing(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<BorrowingInput>,
) -> AppResult<(StatusCode, Json<BorrowingView>)> {
    let borrowing = state.circulation.create_borrowing(input).await?;
    let view = state.circulation.borrowing_view(borrowing).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn get_borrowing(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<BorrowingId>,
) -> AppResult<Json<BorrowingView>> {
    let borrowing = state.circulation.get_borrowing(id).await?;
    Ok(Json(state.circulation.borrowing_view(borrowing).await?))
}

pub async fn update_borrowing(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<BorrowingId>,
    ApiJson(update): ApiJson<BorrowingUpdate>,
) -> AppResult<Json<BorrowingView>> {
    let borrowing = state.circulation.update_borrowing(id, update).await?;
    Ok(Json(state.circulation.borrowing_view(borrowing).await?))
}

pub async fn patch_borrowing(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<BorrowingId>,
    ApiJson(patch): ApiJson<BorrowingPatch>,
) -> AppResult<Json<BorrowingView>> {
    let borrowing = state.circulation.patch_borrowing(id, patch).await?;
    Ok(Json(state.circulation.borrowing_view(borrowing).await?))
}

pub async fn delete_borrowing(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<BorrowingId>,
) -> AppResult<StatusCode> {
    state.circulation.delete_borrowing(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
