//! Comment service.

use sea_orm::Set;
use vidtube_common::{AppError, AppResult, IdGenerator};
use vidtube_db::{
    entities::{comment, relation::RelationKind, user},
    repositories::{CommentRepository, VideoRepository},
};

use crate::services::relation::RelationService;

const DEFAULT_PAGE_SIZE: u64 = 10;
const MAX_PAGE_SIZE: u64 = 100;

/// Comment service for business logic.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    video_repo: VideoRepository,
    relation: RelationService,
    id_gen: IdGenerator,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub fn new(
        comment_repo: CommentRepository,
        video_repo: VideoRepository,
        relation: RelationService,
    ) -> Self {
        Self {
            comment_repo,
            video_repo,
            relation,
            id_gen: IdGenerator::new(),
        }
    }

    /// Comments on a video, newest first, with authors resolved.
    pub async fn list(
        &self,
        video_id: &str,
        page: Option<u64>,
        limit: Option<u64>,
    ) -> AppResult<Vec<(comment::Model, Option<user::Model>)>> {
        self.video_repo.get_by_id(video_id).await?;

        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        let page = page.unwrap_or(1).max(1);

        self.comment_repo
            .find_by_video(video_id, (page - 1) * limit, limit)
            .await
    }

    /// Add a comment to a video.
    pub async fn add(
        &self,
        user_id: &str,
        video_id: &str,
        content: &str,
    ) -> AppResult<comment::Model> {
        if content.trim().is_empty() {
            return Err(AppError::Validation(
                "Comment content is required".to_string(),
            ));
        }

        self.video_repo.get_by_id(video_id).await?;

        let model = comment::ActiveModel {
            id: Set(self.id_gen.generate()),
            video_id: Set(video_id.to_string()),
            owner_id: Set(user_id.to_string()),
            content: Set(content.to_string()),
            ..Default::default()
        };

        self.comment_repo.create(model).await
    }

    /// Rewrite a comment. Owner-gated.
    pub async fn update(&self, user_id: &str, id: &str, content: &str) -> AppResult<comment::Model> {
        if content.trim().is_empty() {
            return Err(AppError::Validation(
                "Comment content is required".to_string(),
            ));
        }

        let comment = self.comment_repo.get_by_id(id).await?;
        Self::ensure_owner(&comment, user_id)?;

        let mut active: comment::ActiveModel = comment.into();
        active.content = Set(content.to_string());
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        self.comment_repo.update(active).await
    }

    /// Delete a comment and its likes. Owner-gated.
    pub async fn delete(&self, user_id: &str, id: &str) -> AppResult<()> {
        let comment = self.comment_repo.get_by_id(id).await?;
        Self::ensure_owner(&comment, user_id)?;

        self.comment_repo.delete_by_id(id).await?;
        self.relation
            .clear_object(id, RelationKind::CommentLike)
            .await?;

        Ok(())
    }

    fn ensure_owner(comment: &comment::Model, user_id: &str) -> AppResult<()> {
        if comment.owner_id == user_id {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Only the owner can modify this comment".to_string(),
            ))
        }
    }
}
