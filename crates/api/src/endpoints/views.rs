//! Response payload shapes.
//!
//! Entity models are mapped into these views before serialization so
//! credentials (password hash, bearer token) never leave the server.

#![allow(missing_docs)]

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use vidtube_core::ChannelStats;
use vidtube_db::entities::{comment, playlist, tweet, user, video};

/// Public view of a user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: String,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub avatar_url: String,
    pub cover_image_url: Option<String>,
    pub created_at: DateTime<FixedOffset>,
}

impl From<user::Model> for UserView {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            avatar_url: user.avatar_url,
            cover_image_url: user.cover_image_url,
            created_at: user.created_at,
        }
    }
}

/// Public view of a video, optionally with its owner resolved.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoView {
    pub id: String,
    pub owner_id: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub title: String,
    pub description: String,
    pub duration: Option<f64>,
    pub views: i64,
    pub is_published: bool,
    pub created_at: DateTime<FixedOffset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<UserView>,
}

impl VideoView {
    /// Build a view with the owner resolved.
    #[must_use]
    pub fn with_owner(video: video::Model, owner: Option<user::Model>) -> Self {
        let mut view = Self::from(video);
        view.owner = owner.map(UserView::from);
        view
    }
}

impl From<video::Model> for VideoView {
    fn from(video: video::Model) -> Self {
        Self {
            id: video.id,
            owner_id: video.owner_id,
            video_url: video.video_url,
            thumbnail_url: video.thumbnail_url,
            title: video.title,
            description: video.description,
            duration: video.duration,
            views: video.views,
            is_published: video.is_published,
            created_at: video.created_at,
            owner: None,
        }
    }
}

/// Public view of a comment, optionally with its author resolved.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: String,
    pub video_id: String,
    pub owner_id: String,
    pub content: String,
    pub created_at: DateTime<FixedOffset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<UserView>,
}

impl CommentView {
    /// Build a view with the author resolved.
    #[must_use]
    pub fn with_owner(comment: comment::Model, owner: Option<user::Model>) -> Self {
        let mut view = Self::from(comment);
        view.owner = owner.map(UserView::from);
        view
    }
}

impl From<comment::Model> for CommentView {
    fn from(comment: comment::Model) -> Self {
        Self {
            id: comment.id,
            video_id: comment.video_id,
            owner_id: comment.owner_id,
            content: comment.content,
            created_at: comment.created_at,
            owner: None,
        }
    }
}

/// Public view of a tweet.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TweetView {
    pub id: String,
    pub owner_id: String,
    pub content: String,
    pub created_at: DateTime<FixedOffset>,
}

impl From<tweet::Model> for TweetView {
    fn from(tweet: tweet::Model) -> Self {
        Self {
            id: tweet.id,
            owner_id: tweet.owner_id,
            content: tweet.content,
            created_at: tweet.created_at,
        }
    }
}

/// Public view of a playlist, optionally with its videos resolved.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistView {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<FixedOffset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub videos: Option<Vec<VideoView>>,
}

impl PlaylistView {
    /// Build a view with the member videos resolved.
    #[must_use]
    pub fn with_videos(playlist: playlist::Model, videos: Vec<video::Model>) -> Self {
        let mut view = Self::from(playlist);
        view.videos = Some(videos.into_iter().map(VideoView::from).collect());
        view
    }
}

impl From<playlist::Model> for PlaylistView {
    fn from(playlist: playlist::Model) -> Self {
        Self {
            id: playlist.id,
            owner_id: playlist.owner_id,
            name: playlist.name,
            description: playlist.description,
            created_at: playlist.created_at,
            videos: None,
        }
    }
}

/// Public view of a channel page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelProfileView {
    #[serde(flatten)]
    pub user: UserView,
    pub subscribers_count: u64,
    pub subscribed_to_count: u64,
    pub is_subscribed: bool,
}

/// Channel statistics payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStatsView {
    pub total_videos: u64,
    pub total_views: i64,
    pub total_subscribers: u64,
    pub total_likes: u64,
}

impl From<ChannelStats> for ChannelStatsView {
    fn from(stats: ChannelStats) -> Self {
        Self {
            total_videos: stats.total_videos,
            total_views: stats.total_views,
            total_subscribers: stats.total_subscribers,
            total_likes: stats.total_likes,
        }
    }
}
