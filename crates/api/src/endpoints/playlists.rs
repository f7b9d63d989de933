//! Playlist endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, patch, post},
};
use serde::Deserialize;
use validator::Validate;
use vidtube_common::{AppResult, EntityId};

use crate::endpoints::views::PlaylistView;
use crate::extractors::AuthUser;
use crate::middleware::AppState;
use crate::response::ApiResponse;

/// Playlist creation request.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePlaylistRequest {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    #[validate(length(min = 1, max = 2048))]
    pub description: String,
}

/// Playlist update request.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePlaylistRequest {
    #[validate(length(min = 1, max = 128))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 2048))]
    pub description: Option<String>,
}

/// Create an empty playlist.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreatePlaylistRequest>,
) -> AppResult<ApiResponse<PlaylistView>> {
    req.validate()?;

    let playlist = state
        .playlist_service
        .create(&user.id, &req.name, &req.description)
        .await?;

    Ok(ApiResponse::created(
        "Playlist created successfully",
        PlaylistView::from(playlist),
    ))
}

/// A playlist with its videos, most recently added first.
async fn get_playlist(
    State(state): State<AppState>,
    Path(playlist_id): Path<String>,
) -> AppResult<ApiResponse<PlaylistView>> {
    let id = EntityId::parse(&playlist_id)?;
    let (playlist, videos) = state.playlist_service.get(id.as_str()).await?;

    Ok(ApiResponse::ok(
        "Playlist fetched successfully",
        PlaylistView::with_videos(playlist, videos),
    ))
}

/// Playlists of a user, newest first.
async fn list_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<ApiResponse<Vec<PlaylistView>>> {
    let id = EntityId::parse(&user_id)?;
    let playlists = state.playlist_service.list_by_user(id.as_str()).await?;

    Ok(ApiResponse::ok(
        "Playlists fetched successfully",
        playlists.into_iter().map(PlaylistView::from).collect(),
    ))
}

/// Rename or re-describe a playlist.
async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(playlist_id): Path<String>,
    Json(req): Json<UpdatePlaylistRequest>,
) -> AppResult<ApiResponse<PlaylistView>> {
    req.validate()?;
    let id = EntityId::parse(&playlist_id)?;

    let playlist = state
        .playlist_service
        .update(&user.id, id.as_str(), req.name, req.description)
        .await?;

    Ok(ApiResponse::ok(
        "Playlist updated successfully",
        PlaylistView::from(playlist),
    ))
}

/// Delete a playlist. Its videos are untouched.
async fn delete(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(playlist_id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    let id = EntityId::parse(&playlist_id)?;
    state.playlist_service.delete(&user.id, id.as_str()).await?;

    Ok(ApiResponse::ok("Playlist deleted successfully", ()))
}

/// Add a video to a playlist. Re-adding is a no-op.
async fn add_video(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path((video_id, playlist_id)): Path<(String, String)>,
) -> AppResult<ApiResponse<PlaylistView>> {
    let video_id = EntityId::parse(&video_id)?;
    let playlist_id = EntityId::parse(&playlist_id)?;

    let (playlist, videos) = state
        .playlist_service
        .add_video(&user.id, playlist_id.as_str(), video_id.as_str())
        .await?;

    Ok(ApiResponse::ok(
        "Video added to playlist successfully",
        PlaylistView::with_videos(playlist, videos),
    ))
}

/// Remove a video from a playlist. Removing an absent video is a no-op.
async fn remove_video(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path((video_id, playlist_id)): Path<(String, String)>,
) -> AppResult<ApiResponse<PlaylistView>> {
    let video_id = EntityId::parse(&video_id)?;
    let playlist_id = EntityId::parse(&playlist_id)?;

    let (playlist, videos) = state
        .playlist_service
        .remove_video(&user.id, playlist_id.as_str(), video_id.as_str())
        .await?;

    Ok(ApiResponse::ok(
        "Video removed from playlist successfully",
        PlaylistView::with_videos(playlist, videos),
    ))
}

/// Create the playlists router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create))
        .route(
            "/{playlistId}",
            get(get_playlist).patch(update).delete(delete),
        )
        .route("/user/{userId}", get(list_by_user))
        .route("/add/{videoId}/{playlistId}", patch(add_video))
        .route("/remove/{videoId}/{playlistId}", patch(remove_video))
}
