//! Comment endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch},
};
use serde::Deserialize;
use validator::Validate;
use vidtube_common::{AppResult, EntityId};

use crate::endpoints::views::CommentView;
use crate::extractors::AuthUser;
use crate::middleware::AppState;
use crate::response::ApiResponse;

/// Pagination query parameters.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

/// Comment body.
#[derive(Debug, Deserialize, Validate)]
pub struct CommentBody {
    #[validate(length(min = 1, max = 2048))]
    pub content: String,
}

/// Comments on a video, newest first.
async fn list(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<Vec<CommentView>>> {
    let id = EntityId::parse(&video_id)?;

    let comments = state
        .comment_service
        .list(id.as_str(), query.page, query.limit)
        .await?;

    Ok(ApiResponse::ok(
        "Comments fetched successfully",
        comments
            .into_iter()
            .map(|(comment, owner)| CommentView::with_owner(comment, owner))
            .collect(),
    ))
}

/// Add a comment to a video.
async fn add(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    Json(body): Json<CommentBody>,
) -> AppResult<ApiResponse<CommentView>> {
    body.validate()?;
    let id = EntityId::parse(&video_id)?;

    let comment = state
        .comment_service
        .add(&user.id, id.as_str(), &body.content)
        .await?;

    Ok(ApiResponse::created(
        "Comment added successfully",
        CommentView::from(comment),
    ))
}

/// Rewrite a comment.
async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
    Json(body): Json<CommentBody>,
) -> AppResult<ApiResponse<CommentView>> {
    body.validate()?;
    let id = EntityId::parse(&comment_id)?;

    let comment = state
        .comment_service
        .update(&user.id, id.as_str(), &body.content)
        .await?;

    Ok(ApiResponse::ok(
        "Comment updated successfully",
        CommentView::from(comment),
    ))
}

/// Delete a comment.
async fn delete(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    let id = EntityId::parse(&comment_id)?;
    state.comment_service.delete(&user.id, id.as_str()).await?;

    Ok(ApiResponse::ok("Comment deleted successfully", ()))
}

/// Create the comments router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{videoId}", get(list).post(add))
        .route("/c/{commentId}", patch(update).delete(delete))
}
