//! Like endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::{get, post},
};
use vidtube_common::{AppResult, EntityId};
use vidtube_core::ToggleState;

use crate::endpoints::views::VideoView;
use crate::extractors::AuthUser;
use crate::middleware::AppState;
use crate::response::ApiResponse;

/// 201 with a "liked" message when the relation turned on, 200 with an
/// "unliked" message when it turned off.
fn toggle_response(state: ToggleState, noun: &str) -> ApiResponse<bool> {
    if state.is_on() {
        ApiResponse::created(format!("{noun} liked successfully"), true)
    } else {
        ApiResponse::ok(format!("{noun} unliked successfully"), false)
    }
}

/// Like or unlike a video.
async fn toggle_video_like(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> AppResult<ApiResponse<bool>> {
    let id = EntityId::parse(&video_id)?;
    let toggled = state
        .like_service
        .toggle_video_like(&user.id, id.as_str())
        .await?;

    Ok(toggle_response(toggled, "Video"))
}

/// Like or unlike a comment.
async fn toggle_comment_like(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
) -> AppResult<ApiResponse<bool>> {
    let id = EntityId::parse(&comment_id)?;
    let toggled = state
        .like_service
        .toggle_comment_like(&user.id, id.as_str())
        .await?;

    Ok(toggle_response(toggled, "Comment"))
}

/// Like or unlike a tweet.
async fn toggle_tweet_like(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(tweet_id): Path<String>,
) -> AppResult<ApiResponse<bool>> {
    let id = EntityId::parse(&tweet_id)?;
    let toggled = state
        .like_service
        .toggle_tweet_like(&user.id, id.as_str())
        .await?;

    Ok(toggle_response(toggled, "Tweet"))
}

/// Videos the current user has liked, most recent like first.
async fn liked_videos(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<VideoView>>> {
    let videos = state.like_service.liked_videos(&user.id).await?;

    Ok(ApiResponse::ok(
        "Liked videos fetched successfully",
        videos.into_iter().map(VideoView::from).collect(),
    ))
}

/// Create the likes router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/toggle/v/{videoId}", post(toggle_video_like))
        .route("/toggle/c/{commentId}", post(toggle_comment_like))
        .route("/toggle/t/{tweetId}", post(toggle_tweet_like))
        .route("/videos", get(liked_videos))
}
