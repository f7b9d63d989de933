//! Database repositories.

mod comment;
mod playlist;
mod relation;
mod tweet;
mod user;
mod video;

pub use comment::CommentRepository;
pub use playlist::PlaylistRepository;
pub use relation::RelationRepository;
pub use tweet::TweetRepository;
pub use user::UserRepository;
pub use video::{VideoListParams, VideoRepository, VideoSort};
