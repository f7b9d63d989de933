//! User service.
//!
//! Registration, login, token lifecycle, account updates and the public
//! channel profile.

use argon2::{
    Argon2, PasswordHasher, PasswordVerifier,
    password_hash::{PasswordHash, SaltString, rand_core::OsRng},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;
use vidtube_common::{AppError, AppResult, IdGenerator};
use vidtube_db::{
    entities::{relation::RelationKind, user},
    repositories::{RelationRepository, UserRepository},
};

use crate::services::media::{MediaService, UploadFile};

/// Registration input after multipart assembly.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterInput {
    /// Desired username; stored lowercased.
    #[validate(length(min = 1, max = 64))]
    pub username: String,

    /// Email address.
    #[validate(email)]
    pub email: String,

    /// Display name.
    #[validate(length(min = 1, max = 128))]
    pub full_name: String,

    /// Plaintext password, hashed before storage.
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

/// A user's public channel page.
#[derive(Debug, Clone)]
pub struct ChannelProfile {
    /// The channel owner.
    pub user: user::Model,
    /// Number of subscribers.
    pub subscribers_count: u64,
    /// Number of channels the owner subscribes to.
    pub subscribed_to_count: u64,
    /// Whether the viewer subscribes to this channel.
    pub is_subscribed: bool,
}

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    relation_repo: RelationRepository,
    media: MediaService,
    id_gen: IdGenerator,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub fn new(
        user_repo: UserRepository,
        relation_repo: RelationRepository,
        media: MediaService,
    ) -> Self {
        Self {
            user_repo,
            relation_repo,
            media,
            id_gen: IdGenerator::new(),
        }
    }

    /// Register a new user.
    ///
    /// Username and email must be unused (409 otherwise). The avatar is
    /// required, the cover image optional; if the row insert fails after the
    /// uploads went through, the uploaded assets are deleted.
    pub async fn register(
        &self,
        input: RegisterInput,
        avatar: &UploadFile,
        cover_image: Option<&UploadFile>,
    ) -> AppResult<user::Model> {
        input.validate()?;

        // Length rules pass whitespace-only values; the trimmed form is what
        // gets stored, so it must be non-empty too.
        let username = input.username.trim().to_lowercase();
        if username.is_empty() || input.full_name.trim().is_empty() {
            return Err(AppError::Validation("All fields are required".to_string()));
        }

        if self
            .user_repo
            .find_by_username_or_email(&username, input.email.trim())
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "Username or email already in use".to_string(),
            ));
        }

        let password_hash = hash_password(&input.password)?;

        let stored_avatar = self.media.upload_file(avatar).await?;
        let stored_cover = match cover_image {
            Some(file) => match self.media.upload_file(file).await {
                Ok(stored) => Some(stored),
                Err(e) => {
                    self.discard_asset(&stored_avatar.key).await;
                    return Err(e);
                }
            },
            None => None,
        };

        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            username: Set(username.clone()),
            email: Set(input.email.trim().to_string()),
            full_name: Set(input.full_name.trim().to_string()),
            password_hash: Set(password_hash),
            avatar_url: Set(stored_avatar.url.clone()),
            cover_image_url: Set(stored_cover.as_ref().map(|c| c.url.clone())),
            ..Default::default()
        };

        match self.user_repo.create(model).await {
            Ok(created) => {
                tracing::info!(user_id = %created.id, username = %username, "Registered user");
                Ok(created)
            }
            Err(e) => {
                self.discard_asset(&stored_avatar.key).await;
                if let Some(cover) = stored_cover {
                    self.discard_asset(&cover.key).await;
                }
                Err(e)
            }
        }
    }

    /// Log in with username or email. Issues a fresh bearer token.
    pub async fn login(&self, identifier: &str, password: &str) -> AppResult<(user::Model, String)> {
        let identifier = identifier.trim().to_lowercase();

        let user = self
            .user_repo
            .find_by_username_or_email(&identifier, &identifier)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::Unauthorized);
        }

        let token = self.id_gen.generate_token();
        self.user_repo.set_token(&user.id, Some(token.clone())).await?;

        tracing::info!(user_id = %user.id, "User logged in");
        Ok((user, token))
    }

    /// Invalidate the stored bearer token.
    pub async fn logout(&self, user_id: &str) -> AppResult<()> {
        self.user_repo.set_token(user_id, None).await
    }

    /// Resolve a bearer token to its user.
    pub async fn authenticate(&self, token: &str) -> AppResult<user::Model> {
        self.user_repo
            .find_by_token(token)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    /// Fetch a user by id.
    pub async fn get(&self, user_id: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_id(user_id).await
    }

    /// Change the password after verifying the current one.
    pub async fn change_password(
        &self,
        user_id: &str,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        if new_password.is_empty() {
            return Err(AppError::Validation(
                "New password is required".to_string(),
            ));
        }

        let user = self.user_repo.get_by_id(user_id).await?;
        if !verify_password(current_password, &user.password_hash)? {
            return Err(AppError::BadRequest(
                "Current password is incorrect".to_string(),
            ));
        }

        let mut active: user::ActiveModel = user.into();
        active.password_hash = Set(hash_password(new_password)?);
        active.updated_at = Set(Some(chrono::Utc::now().into()));
        self.user_repo.update(active).await?;

        Ok(())
    }

    /// Update display name and/or email.
    pub async fn update_account(
        &self,
        user_id: &str,
        full_name: Option<String>,
        email: Option<String>,
    ) -> AppResult<user::Model> {
        if full_name.is_none() && email.is_none() {
            return Err(AppError::BadRequest("Nothing to update".to_string()));
        }

        let user = self.user_repo.get_by_id(user_id).await?;
        let mut active: user::ActiveModel = user.into();

        if let Some(full_name) = full_name {
            if full_name.trim().is_empty() {
                return Err(AppError::Validation(
                    "Full name cannot be empty".to_string(),
                ));
            }
            active.full_name = Set(full_name.trim().to_string());
        }
        if let Some(email) = email {
            if email.trim().is_empty() {
                return Err(AppError::Validation("Email cannot be empty".to_string()));
            }
            active.email = Set(email.trim().to_string());
        }
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        self.user_repo.update(active).await
    }

    /// Replace the avatar; the previous asset is deleted.
    pub async fn update_avatar(&self, user_id: &str, file: &UploadFile) -> AppResult<user::Model> {
        let user = self.user_repo.get_by_id(user_id).await?;
        let old_url = user.avatar_url.clone();

        let stored = self.media.upload_file(file).await?;
        let mut active: user::ActiveModel = user.into();
        active.avatar_url = Set(stored.url.clone());
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        let updated = self.user_repo.update(active).await?;
        if let Err(e) = self.media.delete_by_url(&old_url).await {
            tracing::warn!(error = %e, "Failed to delete replaced avatar");
        }
        Ok(updated)
    }

    /// Replace the cover image; the previous asset (if any) is deleted.
    pub async fn update_cover_image(
        &self,
        user_id: &str,
        file: &UploadFile,
    ) -> AppResult<user::Model> {
        let user = self.user_repo.get_by_id(user_id).await?;
        let old_url = user.cover_image_url.clone();

        let stored = self.media.upload_file(file).await?;
        let mut active: user::ActiveModel = user.into();
        active.cover_image_url = Set(Some(stored.url.clone()));
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        let updated = self.user_repo.update(active).await?;
        if let Some(old_url) = old_url {
            if let Err(e) = self.media.delete_by_url(&old_url).await {
                tracing::warn!(error = %e, "Failed to delete replaced cover image");
            }
        }
        Ok(updated)
    }

    /// Public channel page for a username, with subscription counters and
    /// the viewer's subscription state.
    pub async fn channel_profile(
        &self,
        username: &str,
        viewer_id: Option<&str>,
    ) -> AppResult<ChannelProfile> {
        let username = username.trim().to_lowercase();
        let user = self
            .user_repo
            .find_by_username(&username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Channel not found: {username}")))?;

        let subscribers_count = self
            .relation_repo
            .count_by_object(&user.id, RelationKind::Subscription)
            .await?;
        let subscribed_to_count = self
            .relation_repo
            .find_by_subject(&user.id, RelationKind::Subscription)
            .await?
            .len() as u64;

        let is_subscribed = match viewer_id {
            Some(viewer_id) => {
                self.relation_repo
                    .exists(viewer_id, &user.id, RelationKind::Subscription)
                    .await?
            }
            None => false,
        };

        Ok(ChannelProfile {
            user,
            subscribers_count,
            subscribed_to_count,
            is_subscribed,
        })
    }

    async fn discard_asset(&self, key: &str) {
        if let Err(e) = self.media.delete(key).await {
            tracing::warn!(key = %key, error = %e, "Failed to discard uploaded asset");
        }
    }
}

/// Hash a password using Argon2.
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
