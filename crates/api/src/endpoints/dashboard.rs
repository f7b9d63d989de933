//! Channel dashboard endpoints. Everything here is scoped to the
//! authenticated user's own channel.

use axum::{Router, extract::State, routing::get};
use vidtube_common::AppResult;

use crate::endpoints::views::{ChannelStatsView, VideoView};
use crate::extractors::AuthUser;
use crate::middleware::AppState;
use crate::response::ApiResponse;

/// Aggregate counters for the current channel.
async fn stats(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<ChannelStatsView>> {
    let stats = state.dashboard_service.stats(&user.id).await?;

    Ok(ApiResponse::ok(
        "Channel stats fetched successfully",
        ChannelStatsView::from(stats),
    ))
}

/// All videos on the current channel, drafts included.
async fn videos(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<VideoView>>> {
    let videos = state.dashboard_service.videos(&user.id).await?;

    Ok(ApiResponse::ok(
        "Channel videos fetched successfully",
        videos.into_iter().map(VideoView::from).collect(),
    ))
}

/// Create the dashboard router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(stats))
        .route("/videos", get(videos))
}
