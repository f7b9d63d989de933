//! Dashboard service.
//!
//! Channel statistics for the authenticated owner. Zero is a valid value for
//! every counter; an empty channel reports all zeroes rather than an error.

use serde::Serialize;
use vidtube_common::AppResult;
use vidtube_db::{
    entities::{relation::RelationKind, video},
    repositories::{RelationRepository, VideoRepository},
};

/// Aggregated channel statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStats {
    /// Number of videos on the channel.
    pub total_videos: u64,
    /// Sum of view counters across the channel's videos.
    pub total_views: i64,
    /// Number of subscribers.
    pub total_subscribers: u64,
    /// Number of likes across the channel's videos.
    pub total_likes: u64,
}

/// Dashboard service for business logic.
#[derive(Clone)]
pub struct DashboardService {
    video_repo: VideoRepository,
    relation_repo: RelationRepository,
}

impl DashboardService {
    /// Create a new dashboard service.
    #[must_use]
    pub const fn new(video_repo: VideoRepository, relation_repo: RelationRepository) -> Self {
        Self {
            video_repo,
            relation_repo,
        }
    }

    /// Aggregate statistics for a channel.
    pub async fn stats(&self, channel_id: &str) -> AppResult<ChannelStats> {
        let total_videos = self.video_repo.count_by_owner(channel_id).await?;
        let total_views = self.video_repo.sum_views(channel_id).await?;
        let total_subscribers = self
            .relation_repo
            .count_by_object(channel_id, RelationKind::Subscription)
            .await?;

        let video_ids = self.video_repo.find_ids_by_owner(channel_id).await?;
        let total_likes = self
            .relation_repo
            .count_by_objects(&video_ids, RelationKind::VideoLike)
            .await?;

        Ok(ChannelStats {
            total_videos,
            total_views,
            total_subscribers,
            total_likes,
        })
    }

    /// All videos of a channel, newest first.
    pub async fn videos(&self, channel_id: &str) -> AppResult<Vec<video::Model>> {
        self.video_repo.find_by_owner(channel_id).await
    }
}
