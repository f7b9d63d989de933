//! Subscription endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::{get, post},
};
use vidtube_common::{AppResult, EntityId};

use crate::endpoints::views::UserView;
use crate::extractors::AuthUser;
use crate::middleware::AppState;
use crate::response::ApiResponse;

/// Subscribe to or unsubscribe from a channel.
async fn toggle(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
) -> AppResult<ApiResponse<bool>> {
    let id = EntityId::parse(&channel_id)?;
    let toggled = state
        .subscription_service
        .toggle(&user.id, id.as_str())
        .await?;

    let message = if toggled.is_on() {
        "Subscribed successfully"
    } else {
        "Unsubscribed successfully"
    };
    Ok(ApiResponse::ok(message, toggled.is_on()))
}

/// Subscribers of a channel, most recent first.
async fn subscribers(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
) -> AppResult<ApiResponse<Vec<UserView>>> {
    let id = EntityId::parse(&channel_id)?;
    let users = state.subscription_service.subscribers(id.as_str()).await?;

    Ok(ApiResponse::ok(
        "Subscribers fetched successfully",
        users.into_iter().map(UserView::from).collect(),
    ))
}

/// Channels a user is subscribed to, most recent first.
async fn subscribed_channels(
    State(state): State<AppState>,
    Path(subscriber_id): Path<String>,
) -> AppResult<ApiResponse<Vec<UserView>>> {
    let id = EntityId::parse(&subscriber_id)?;
    let users = state
        .subscription_service
        .subscribed_channels(id.as_str())
        .await?;

    Ok(ApiResponse::ok(
        "Subscribed channels fetched successfully",
        users.into_iter().map(UserView::from).collect(),
    ))
}

/// Create the subscriptions router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/c/{channelId}", post(toggle).get(subscribers))
        .route("/u/{subscriberId}", get(subscribed_channels))
}
