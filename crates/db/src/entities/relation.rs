//! Relation entity.
//!
//! A relation records that a subject holds an active link toward an object:
//! a like, a channel subscription, or a video's membership in a playlist.
//! Existence of the row is the boolean state; the unique index on
//! (`subject_id`, `object_id`, `kind`) guarantees at most one row per tuple.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of a relation.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "camelCase")]
pub enum RelationKind {
    /// User likes a video.
    #[sea_orm(string_value = "video_like")]
    VideoLike,
    /// User likes a comment.
    #[sea_orm(string_value = "comment_like")]
    CommentLike,
    /// User likes a tweet.
    #[sea_orm(string_value = "tweet_like")]
    TweetLike,
    /// User subscribes to a channel (another user).
    #[sea_orm(string_value = "subscription")]
    Subscription,
    /// Video belongs to a playlist (subject is the playlist).
    #[sea_orm(string_value = "playlist_video")]
    PlaylistVideo,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "relation")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// The acting side of the relation (user, or playlist for memberships)
    pub subject_id: String,

    /// The target of the relation (video, comment, tweet or channel)
    pub object_id: String,

    pub kind: RelationKind,

    pub created_at: DateTimeWithTimeZone,
}

// Subject and object reference different tables depending on kind, so no
// foreign keys are declared here; referential cleanup happens in services.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
