use axum::{Json, extract::State, http::StatusCode};

use shelf_core::{
    api_types::{BorrowingView, MemberInput, MemberPatch},
    model::{Member, MemberId},
};

use crate::{
    AppState,
    infra::{errors::AppResult, extract::{ApiJson, ApiPath}},
};

pub async fn list_members(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Member>>> {
    Ok(Json(state.patrons.list_members().await?))
}

pub async fn create_member(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<MemberInput>,
) -> AppResult<(StatusCode, Json<Member>)> {
    let member = state.patrons.create_member(input).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

pub async fn get_member(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<MemberId>,
) -> AppResult<Json<Member>> {
    Ok(Json(state.patrons.get_member(id).await?))
}

pub async fn update_member(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<MemberId>,
    ApiJson(input): ApiJson<MemberInput>,
) -> AppResult<Json<Member>> {
    Ok(Json(state.patrons.update_member(id, input).await?))
}

pub async fn patch_member(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<MemberId>,
    ApiJson(patch): ApiJson<MemberPatch>,
) -> AppResult<Json<Member>> {
    Ok(Json(state.patrons.patch_member(id, patch).await?))
}

pub async fn delete_member(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<MemberId>,
) -> AppResult<StatusCode> {
    state.patrons.delete_member(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Loans of one member, newest first.
pub async fn member_borrowings(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<MemberId>,
) -> AppResult<Json<Vec<BorrowingView>>> {
    let borrowings = state.circulation.member_borrowings(id).await?;
    Ok(Json(state.circulation.borrowing_views(borrowings).await?))
}
