//! Video endpoints.

use axum::{
    Router,
    extract::{Multipart, Path, Query, State},
    routing::{get, patch},
};
use serde::Deserialize;
use vidtube_common::{AppResult, EntityId};
use vidtube_core::VideoListQuery;

use crate::endpoints::views::VideoView;
use crate::extractors::AuthUser;
use crate::middleware::AppState;
use crate::multipart::FormData;
use crate::response::ApiResponse;

/// Listing query parameters.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub query: Option<String>,
    pub user_id: Option<String>,
    pub sort_by: Option<String>,
    pub sort_type: Option<String>,
}

/// Paginated listing with owners resolved.
async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<ApiResponse<Vec<VideoView>>> {
    let owner_id = match query.user_id {
        Some(ref raw) => Some(EntityId::parse(raw)?.into_string()),
        None => None,
    };

    let videos = state
        .video_service
        .list(VideoListQuery {
            page: query.page,
            limit: query.limit,
            query: query.query,
            owner_id,
            sort_by: query.sort_by,
            sort_type: query.sort_type,
        })
        .await?;

    Ok(ApiResponse::ok(
        "Videos fetched successfully",
        videos
            .into_iter()
            .map(|(video, owner)| VideoView::with_owner(video, owner))
            .collect(),
    ))
}

/// Publish a video from a multipart form.
async fn publish(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<ApiResponse<VideoView>> {
    let form = FormData::read(multipart).await?;

    let title = form.require_field("title")?;
    let description = form.require_field("description")?;
    let video_file = form.require_file("videoFile")?;
    let thumbnail = form.require_file("thumbnail")?;
    let duration = form.field("duration").and_then(|d| d.parse::<f64>().ok());

    let video = state
        .video_service
        .publish(&user.id, title, description, video_file, thumbnail, duration)
        .await?;

    Ok(ApiResponse::created(
        "Video published successfully",
        VideoView::from(video),
    ))
}

/// Fetch a video (records the view).
async fn get_video(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> AppResult<ApiResponse<VideoView>> {
    let id = EntityId::parse(&video_id)?;
    let (video, owner) = state.video_service.get(id.as_str()).await?;

    Ok(ApiResponse::ok(
        "Video fetched successfully",
        VideoView::with_owner(video, owner),
    ))
}

/// Update title, description or thumbnail.
async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    multipart: Multipart,
) -> AppResult<ApiResponse<VideoView>> {
    let id = EntityId::parse(&video_id)?;
    let form = FormData::read(multipart).await?;

    let video = state
        .video_service
        .update(
            &user.id,
            id.as_str(),
            form.field("title").map(ToString::to_string),
            form.field("description").map(ToString::to_string),
            form.file("thumbnail"),
        )
        .await?;

    Ok(ApiResponse::ok(
        "Video updated successfully",
        VideoView::from(video),
    ))
}

/// Delete a video.
async fn delete(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    let id = EntityId::parse(&video_id)?;
    state.video_service.delete(&user.id, id.as_str()).await?;

    Ok(ApiResponse::ok("Video deleted successfully", ()))
}

/// Flip the publish flag.
async fn toggle_publish(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> AppResult<ApiResponse<VideoView>> {
    let id = EntityId::parse(&video_id)?;
    let video = state
        .video_service
        .toggle_publish(&user.id, id.as_str())
        .await?;

    Ok(ApiResponse::ok(
        "Publish status toggled successfully",
        VideoView::from(video),
    ))
}

/// Create the videos router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(publish))
        .route("/{videoId}", get(get_video).patch(update).delete(delete))
        .route("/toggle/publish/{videoId}", patch(toggle_publish))
}
