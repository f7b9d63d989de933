//! Database entities.

pub mod comment;
pub mod playlist;
pub mod relation;
pub mod tweet;
pub mod user;
pub mod video;

pub use comment::Entity as Comment;
pub use playlist::Entity as Playlist;
pub use relation::Entity as Relation;
pub use tweet::Entity as Tweet;
pub use user::Entity as User;
pub use video::Entity as Video;
