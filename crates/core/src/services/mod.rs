//! Service layer.
//!
//! Services own the repositories they need and carry the business rules:
//! ownership checks, validation, relation toggling, media compensation.

pub mod comment;
pub mod dashboard;
pub mod like;
pub mod media;
pub mod playlist;
pub mod relation;
pub mod subscription;
pub mod tweet;
pub mod user;
pub mod video;

pub use comment::CommentService;
pub use dashboard::{ChannelStats, DashboardService};
pub use like::LikeService;
pub use media::{MediaService, UploadFile};
pub use playlist::PlaylistService;
pub use relation::{RelationService, ToggleState};
pub use subscription::SubscriptionService;
pub use tweet::TweetService;
pub use user::{ChannelProfile, RegisterInput, UserService};
pub use video::{VideoListQuery, VideoService};
