//! Like service.
//!
//! Likes on videos, comments and tweets are relation tuples with distinct
//! kinds; this service checks that the target exists before handing the flip
//! to the toggle engine.

use vidtube_common::AppResult;
use vidtube_db::{
    entities::{relation::RelationKind, video},
    repositories::{CommentRepository, TweetRepository, VideoRepository},
};

use crate::services::relation::{RelationService, ToggleState};

/// Like service for business logic.
#[derive(Clone)]
pub struct LikeService {
    relation: RelationService,
    video_repo: VideoRepository,
    comment_repo: CommentRepository,
    tweet_repo: TweetRepository,
}

impl LikeService {
    /// Create a new like service.
    #[must_use]
    pub const fn new(
        relation: RelationService,
        video_repo: VideoRepository,
        comment_repo: CommentRepository,
        tweet_repo: TweetRepository,
    ) -> Self {
        Self {
            relation,
            video_repo,
            comment_repo,
            tweet_repo,
        }
    }

    /// Toggle the current user's like on a video.
    pub async fn toggle_video_like(&self, user_id: &str, video_id: &str) -> AppResult<ToggleState> {
        self.video_repo.get_by_id(video_id).await?;
        self.relation
            .toggle(user_id, video_id, RelationKind::VideoLike)
            .await
    }

    /// Toggle the current user's like on a comment.
    pub async fn toggle_comment_like(
        &self,
        user_id: &str,
        comment_id: &str,
    ) -> AppResult<ToggleState> {
        self.comment_repo.get_by_id(comment_id).await?;
        self.relation
            .toggle(user_id, comment_id, RelationKind::CommentLike)
            .await
    }

    /// Toggle the current user's like on a tweet.
    pub async fn toggle_tweet_like(&self, user_id: &str, tweet_id: &str) -> AppResult<ToggleState> {
        self.tweet_repo.get_by_id(tweet_id).await?;
        self.relation
            .toggle(user_id, tweet_id, RelationKind::TweetLike)
            .await
    }

    /// Videos the user has liked, most recently liked first.
    pub async fn liked_videos(&self, user_id: &str) -> AppResult<Vec<video::Model>> {
        let ids = self
            .relation
            .list_objects(user_id, RelationKind::VideoLike)
            .await?;

        let mut videos = self.video_repo.find_by_ids(&ids).await?;

        // find_by_ids gives no ordering guarantee; restore like recency.
        videos.sort_by_key(|v| ids.iter().position(|id| *id == v.id));
        Ok(videos)
    }

    /// Number of likes on a video.
    pub async fn video_like_count(&self, video_id: &str) -> AppResult<u64> {
        self.relation
            .count_for_object(video_id, RelationKind::VideoLike)
            .await
    }
}
