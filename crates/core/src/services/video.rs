//! Video service.

use sea_orm::Set;
use vidtube_common::{AppError, AppResult, IdGenerator};
use vidtube_db::{
    entities::{relation::RelationKind, user, video},
    repositories::{VideoListParams, VideoRepository, VideoSort},
};

use crate::services::media::{MediaService, UploadFile};
use crate::services::relation::RelationService;

/// Default page size for video listings.
const DEFAULT_PAGE_SIZE: u64 = 10;
/// Upper bound on the page size.
const MAX_PAGE_SIZE: u64 = 100;

/// Listing parameters as received from clients.
#[derive(Debug, Clone, Default)]
pub struct VideoListQuery {
    /// 1-based page number.
    pub page: Option<u64>,
    /// Page size.
    pub limit: Option<u64>,
    /// Case-insensitive title substring filter.
    pub query: Option<String>,
    /// Restrict to a single owner.
    pub owner_id: Option<String>,
    /// Sort column name: `createdAt`, `views`, `duration`, `title`.
    pub sort_by: Option<String>,
    /// `asc` or `desc` (default).
    pub sort_type: Option<String>,
}

impl VideoListQuery {
    fn into_params(self) -> VideoListParams {
        let limit = self
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        let page = self.page.unwrap_or(1).max(1);

        let sort = match self.sort_by.as_deref() {
            Some("views") => VideoSort::Views,
            Some("duration") => VideoSort::Duration,
            Some("title") => VideoSort::Title,
            _ => VideoSort::CreatedAt,
        };

        VideoListParams {
            query: self.query.filter(|q| !q.trim().is_empty()),
            owner_id: self.owner_id,
            sort,
            descending: !matches!(self.sort_type.as_deref(), Some("asc")),
            offset: (page - 1) * limit,
            limit,
        }
    }
}

/// Video service for business logic.
#[derive(Clone)]
pub struct VideoService {
    video_repo: VideoRepository,
    relation: RelationService,
    media: MediaService,
    id_gen: IdGenerator,
}

impl VideoService {
    /// Create a new video service.
    #[must_use]
    pub fn new(video_repo: VideoRepository, relation: RelationService, media: MediaService) -> Self {
        Self {
            video_repo,
            relation,
            media,
            id_gen: IdGenerator::new(),
        }
    }

    /// Paginated listing with owners resolved.
    pub async fn list(
        &self,
        query: VideoListQuery,
    ) -> AppResult<Vec<(video::Model, Option<user::Model>)>> {
        self.video_repo.list(&query.into_params()).await
    }

    /// Publish a video: upload both assets, then create the row.
    ///
    /// If the row insert fails after the uploads went through, the uploaded
    /// assets are deleted so no orphans are left in storage.
    pub async fn publish(
        &self,
        owner_id: &str,
        title: &str,
        description: &str,
        video_file: &UploadFile,
        thumbnail: &UploadFile,
        duration: Option<f64>,
    ) -> AppResult<video::Model> {
        if title.trim().is_empty() || description.trim().is_empty() {
            return Err(AppError::Validation(
                "Title and description are required".to_string(),
            ));
        }

        let stored_video = self.media.upload_file(video_file).await?;

        let stored_thumbnail = match self.media.upload_file(thumbnail).await {
            Ok(stored) => stored,
            Err(e) => {
                self.discard_asset(&stored_video.key).await;
                return Err(e);
            }
        };

        let model = video::ActiveModel {
            id: Set(self.id_gen.generate()),
            owner_id: Set(owner_id.to_string()),
            video_url: Set(stored_video.url.clone()),
            thumbnail_url: Set(stored_thumbnail.url.clone()),
            title: Set(title.to_string()),
            description: Set(description.to_string()),
            duration: Set(duration),
            ..Default::default()
        };

        match self.video_repo.create(model).await {
            Ok(created) => {
                tracing::info!(video_id = %created.id, owner_id = %owner_id, "Published video");
                Ok(created)
            }
            Err(e) => {
                self.discard_asset(&stored_video.key).await;
                self.discard_asset(&stored_thumbnail.key).await;
                Err(e)
            }
        }
    }

    /// Fetch a video with its owner and record the view.
    pub async fn get(&self, id: &str) -> AppResult<(video::Model, Option<user::Model>)> {
        let (mut video, owner) = self
            .video_repo
            .find_with_owner(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Video not found: {id}")))?;

        self.video_repo.increment_views(id).await?;
        video.views += 1;

        Ok((video, owner))
    }

    /// Update title, description or thumbnail. Owner-gated.
    pub async fn update(
        &self,
        user_id: &str,
        id: &str,
        title: Option<String>,
        description: Option<String>,
        thumbnail: Option<&UploadFile>,
    ) -> AppResult<video::Model> {
        if title.is_none() && description.is_none() && thumbnail.is_none() {
            return Err(AppError::BadRequest("Nothing to update".to_string()));
        }

        let video = self.video_repo.get_by_id(id).await?;
        Self::ensure_owner(&video, user_id)?;

        let old_thumbnail_url = video.thumbnail_url.clone();
        let mut active: video::ActiveModel = video.into();

        if let Some(title) = title {
            if title.trim().is_empty() {
                return Err(AppError::Validation("Title cannot be empty".to_string()));
            }
            active.title = Set(title);
        }
        if let Some(description) = description {
            active.description = Set(description);
        }

        let new_thumbnail = match thumbnail {
            Some(file) => {
                let stored = self.media.upload_file(file).await?;
                active.thumbnail_url = Set(stored.url.clone());
                Some(stored)
            }
            None => None,
        };
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        match self.video_repo.update(active).await {
            Ok(updated) => {
                if new_thumbnail.is_some() {
                    if let Err(e) = self.media.delete_by_url(&old_thumbnail_url).await {
                        tracing::warn!(error = %e, "Failed to delete replaced thumbnail");
                    }
                }
                Ok(updated)
            }
            Err(e) => {
                if let Some(stored) = new_thumbnail {
                    self.discard_asset(&stored.key).await;
                }
                Err(e)
            }
        }
    }

    /// Delete a video with its likes, playlist memberships and stored assets.
    /// Owner-gated; comments go away through the foreign key.
    pub async fn delete(&self, user_id: &str, id: &str) -> AppResult<()> {
        let video = self.video_repo.get_by_id(id).await?;
        Self::ensure_owner(&video, user_id)?;

        self.video_repo.delete_by_id(id).await?;

        self.relation
            .clear_object(id, RelationKind::VideoLike)
            .await?;
        self.relation
            .clear_object(id, RelationKind::PlaylistVideo)
            .await?;

        if let Err(e) = self.media.delete_by_url(&video.video_url).await {
            tracing::warn!(error = %e, "Failed to delete video asset");
        }
        if let Err(e) = self.media.delete_by_url(&video.thumbnail_url).await {
            tracing::warn!(error = %e, "Failed to delete thumbnail asset");
        }

        tracing::info!(video_id = %id, "Deleted video");
        Ok(())
    }

    /// Flip the publish flag. Owner-gated.
    pub async fn toggle_publish(&self, user_id: &str, id: &str) -> AppResult<video::Model> {
        let video = self.video_repo.get_by_id(id).await?;
        Self::ensure_owner(&video, user_id)?;

        let next = !video.is_published;
        let mut active: video::ActiveModel = video.into();
        active.is_published = Set(next);
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        self.video_repo.update(active).await
    }

    fn ensure_owner(video: &video::Model, user_id: &str) -> AppResult<()> {
        if video.owner_id == user_id {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Only the owner can modify this video".to_string(),
            ))
        }
    }

    async fn discard_asset(&self, key: &str) {
        if let Err(e) = self.media.delete(key).await {
            tracing::warn!(key = %key, error = %e, "Failed to discard uploaded asset");
        }
    }
}
