//! Tweet endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, patch, post},
};
use serde::Deserialize;
use validator::Validate;
use vidtube_common::{AppResult, EntityId};

use crate::endpoints::views::TweetView;
use crate::extractors::AuthUser;
use crate::middleware::AppState;
use crate::response::ApiResponse;

/// Tweet body.
#[derive(Debug, Deserialize, Validate)]
pub struct TweetBody {
    #[validate(length(min = 1, max = 512))]
    pub content: String,
}

/// Create a tweet.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(body): Json<TweetBody>,
) -> AppResult<ApiResponse<TweetView>> {
    body.validate()?;
    let tweet = state.tweet_service.create(&user.id, &body.content).await?;

    Ok(ApiResponse::created(
        "Tweet created successfully",
        TweetView::from(tweet),
    ))
}

/// Tweets of a user, newest first.
async fn list_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<ApiResponse<Vec<TweetView>>> {
    let id = EntityId::parse(&user_id)?;

    let tweets = state.tweet_service.list_by_user(id.as_str()).await?;

    Ok(ApiResponse::ok(
        "Tweets fetched successfully",
        tweets.into_iter().map(TweetView::from).collect(),
    ))
}

/// Rewrite a tweet.
async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(tweet_id): Path<String>,
    Json(body): Json<TweetBody>,
) -> AppResult<ApiResponse<TweetView>> {
    body.validate()?;
    let id = EntityId::parse(&tweet_id)?;

    let tweet = state
        .tweet_service
        .update(&user.id, id.as_str(), &body.content)
        .await?;

    Ok(ApiResponse::ok(
        "Tweet updated successfully",
        TweetView::from(tweet),
    ))
}

/// Delete a tweet.
async fn delete(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(tweet_id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    let id = EntityId::parse(&tweet_id)?;
    state.tweet_service.delete(&user.id, id.as_str()).await?;

    Ok(ApiResponse::ok("Tweet deleted successfully", ()))
}

/// Create the tweets router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create))
        .route("/user/{userId}", get(list_by_user))
        .route("/{tweetId}", patch(update).delete(delete))
}
