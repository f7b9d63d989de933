//! User endpoints.

use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    routing::{get, patch, post},
};
use serde::{Deserialize, Serialize};
use validator::Validate;
use vidtube_common::{AppError, AppResult};
use vidtube_core::RegisterInput;

use crate::endpoints::views::{ChannelProfileView, UserView};
use crate::extractors::{AuthUser, MaybeAuthUser};
use crate::middleware::AppState;
use crate::multipart::FormData;
use crate::response::ApiResponse;

/// Login request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Username or email.
    #[serde(alias = "email")]
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Login response: the user plus the issued bearer token.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: UserView,
    pub access_token: String,
}

/// Password change request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1))]
    pub old_password: String,
    #[validate(length(min = 8, max = 128))]
    pub new_password: String,
}

/// Account update request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    #[validate(length(min = 1, max = 128))]
    pub full_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
}

/// Register a new user from a multipart form.
async fn register(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<ApiResponse<UserView>> {
    let form = FormData::read(multipart).await?;

    let input = RegisterInput {
        username: form.require_field("username")?.to_string(),
        email: form.require_field("email")?.to_string(),
        full_name: form.require_field("fullName")?.to_string(),
        password: form.require_field("password")?.to_string(),
    };
    let avatar = form.require_file("avatar")?;
    let cover_image = form.file("coverImage");

    let user = state
        .user_service
        .register(input, avatar, cover_image)
        .await?;

    Ok(ApiResponse::created(
        "User registered successfully",
        UserView::from(user),
    ))
}

/// Log in and issue a bearer token.
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<ApiResponse<LoginResponse>> {
    req.validate()?;

    let (user, access_token) = state
        .user_service
        .login(&req.username, &req.password)
        .await?;

    Ok(ApiResponse::ok(
        "User logged in successfully",
        LoginResponse {
            user: UserView::from(user),
            access_token,
        },
    ))
}

/// Invalidate the current token.
async fn logout(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<()>> {
    state.user_service.logout(&user.id).await?;
    Ok(ApiResponse::ok("User logged out successfully", ()))
}

/// The authenticated user.
async fn current_user(AuthUser(user): AuthUser) -> ApiResponse<UserView> {
    ApiResponse::ok("Current user fetched successfully", UserView::from(user))
}

/// Change the current password.
async fn change_password(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ChangePasswordRequest>,
) -> AppResult<ApiResponse<()>> {
    req.validate()?;

    state
        .user_service
        .change_password(&user.id, &req.old_password, &req.new_password)
        .await?;
    Ok(ApiResponse::ok("Password changed successfully", ()))
}

/// Update display name and/or email.
async fn update_account(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<UpdateAccountRequest>,
) -> AppResult<ApiResponse<UserView>> {
    req.validate()?;

    let updated = state
        .user_service
        .update_account(&user.id, req.full_name, req.email)
        .await?;
    Ok(ApiResponse::ok(
        "Account updated successfully",
        UserView::from(updated),
    ))
}

/// Replace the avatar.
async fn update_avatar(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<ApiResponse<UserView>> {
    let form = FormData::read(multipart).await?;
    let file = form.require_file("avatar")?;

    let updated = state.user_service.update_avatar(&user.id, file).await?;
    Ok(ApiResponse::ok(
        "Avatar updated successfully",
        UserView::from(updated),
    ))
}

/// Replace the cover image.
async fn update_cover_image(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<ApiResponse<UserView>> {
    let form = FormData::read(multipart).await?;
    let file = form.require_file("coverImage")?;

    let updated = state
        .user_service
        .update_cover_image(&user.id, file)
        .await?;
    Ok(ApiResponse::ok(
        "Cover image updated successfully",
        UserView::from(updated),
    ))
}

/// Public channel page for a username.
async fn channel_profile(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<ApiResponse<ChannelProfileView>> {
    if username.trim().is_empty() {
        return Err(AppError::Validation("Username is required".to_string()));
    }

    let profile = state
        .user_service
        .channel_profile(&username, viewer.as_ref().map(|u| u.id.as_str()))
        .await?;

    Ok(ApiResponse::ok(
        "Channel profile fetched successfully",
        ChannelProfileView {
            user: UserView::from(profile.user),
            subscribers_count: profile.subscribers_count,
            subscribed_to_count: profile.subscribed_to_count,
            is_subscribed: profile.is_subscribed,
        },
    ))
}

/// Create the users router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(current_user))
        .route("/change-password", post(change_password))
        .route("/update-account", patch(update_account))
        .route("/avatar", patch(update_avatar))
        .route("/cover-image", patch(update_cover_image))
        .route("/c/{username}", get(channel_profile))
}
