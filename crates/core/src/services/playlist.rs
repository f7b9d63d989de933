//! Playlist service.
//!
//! Playlist membership is a relation with the playlist as the subject, so a
//! playlist is a set of videos: re-adding a member and removing a non-member
//! are both success no-ops.

use sea_orm::Set;
use vidtube_common::{AppError, AppResult, IdGenerator};
use vidtube_db::{
    entities::{playlist, relation::RelationKind, video},
    repositories::{PlaylistRepository, VideoRepository},
};

use crate::services::relation::RelationService;

/// Playlist service for business logic.
#[derive(Clone)]
pub struct PlaylistService {
    playlist_repo: PlaylistRepository,
    video_repo: VideoRepository,
    relation: RelationService,
    id_gen: IdGenerator,
}

impl PlaylistService {
    /// Create a new playlist service.
    #[must_use]
    pub fn new(
        playlist_repo: PlaylistRepository,
        video_repo: VideoRepository,
        relation: RelationService,
    ) -> Self {
        Self {
            playlist_repo,
            video_repo,
            relation,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a playlist.
    pub async fn create(
        &self,
        owner_id: &str,
        name: &str,
        description: &str,
    ) -> AppResult<playlist::Model> {
        if name.trim().is_empty() || description.trim().is_empty() {
            return Err(AppError::Validation(
                "Name and description are required".to_string(),
            ));
        }

        let model = playlist::ActiveModel {
            id: Set(self.id_gen.generate()),
            owner_id: Set(owner_id.to_string()),
            name: Set(name.to_string()),
            description: Set(description.to_string()),
            ..Default::default()
        };

        self.playlist_repo.create(model).await
    }

    /// Fetch a playlist with its videos, most recently added first.
    pub async fn get(&self, id: &str) -> AppResult<(playlist::Model, Vec<video::Model>)> {
        let playlist = self.playlist_repo.get_by_id(id).await?;
        let videos = self.videos_of(id).await?;
        Ok((playlist, videos))
    }

    /// Playlists of a user, newest first.
    pub async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<playlist::Model>> {
        self.playlist_repo.find_by_owner(user_id).await
    }

    /// Rename or re-describe a playlist. Owner-gated, at least one field.
    pub async fn update(
        &self,
        user_id: &str,
        id: &str,
        name: Option<String>,
        description: Option<String>,
    ) -> AppResult<playlist::Model> {
        if name.is_none() && description.is_none() {
            return Err(AppError::BadRequest("Nothing to update".to_string()));
        }

        let playlist = self.playlist_repo.get_by_id(id).await?;
        Self::ensure_owner(&playlist, user_id)?;

        let mut active: playlist::ActiveModel = playlist.into();
        if let Some(name) = name {
            if name.trim().is_empty() {
                return Err(AppError::Validation("Name cannot be empty".to_string()));
            }
            active.name = Set(name);
        }
        if let Some(description) = description {
            active.description = Set(description);
        }
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        self.playlist_repo.update(active).await
    }

    /// Delete a playlist and its membership rows. Owner-gated.
    pub async fn delete(&self, user_id: &str, id: &str) -> AppResult<()> {
        let playlist = self.playlist_repo.get_by_id(id).await?;
        Self::ensure_owner(&playlist, user_id)?;

        self.playlist_repo.delete_by_id(id).await?;
        self.relation
            .clear_subject(id, RelationKind::PlaylistVideo)
            .await?;

        Ok(())
    }

    /// Add a video to a playlist; re-adding is a success no-op. Owner-gated.
    /// Returns the playlist with its videos.
    pub async fn add_video(
        &self,
        user_id: &str,
        playlist_id: &str,
        video_id: &str,
    ) -> AppResult<(playlist::Model, Vec<video::Model>)> {
        let playlist = self.playlist_repo.get_by_id(playlist_id).await?;
        Self::ensure_owner(&playlist, user_id)?;
        self.video_repo.get_by_id(video_id).await?;

        self.relation
            .activate(playlist_id, video_id, RelationKind::PlaylistVideo)
            .await?;

        let videos = self.videos_of(playlist_id).await?;
        Ok((playlist, videos))
    }

    /// Remove a video from a playlist; removing a non-member is a success
    /// no-op. Owner-gated. Returns the playlist with its remaining videos.
    pub async fn remove_video(
        &self,
        user_id: &str,
        playlist_id: &str,
        video_id: &str,
    ) -> AppResult<(playlist::Model, Vec<video::Model>)> {
        let playlist = self.playlist_repo.get_by_id(playlist_id).await?;
        Self::ensure_owner(&playlist, user_id)?;

        self.relation
            .deactivate(playlist_id, video_id, RelationKind::PlaylistVideo)
            .await?;

        let videos = self.videos_of(playlist_id).await?;
        Ok((playlist, videos))
    }

    async fn videos_of(&self, playlist_id: &str) -> AppResult<Vec<video::Model>> {
        let ids = self
            .relation
            .list_objects(playlist_id, RelationKind::PlaylistVideo)
            .await?;

        let mut videos = self.video_repo.find_by_ids(&ids).await?;
        videos.sort_by_key(|v| ids.iter().position(|id| *id == v.id));
        Ok(videos)
    }

    fn ensure_owner(playlist: &playlist::Model, user_id: &str) -> AppResult<()> {
        if playlist.owner_id == user_id {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Only the owner can modify this playlist".to_string(),
            ))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use vidtube_db::entities::relation;
    use vidtube_db::repositories::RelationRepository;

    fn test_playlist(id: &str, owner_id: &str) -> playlist::Model {
        playlist::Model {
            id: id.to_string(),
            owner_id: owner_id.to_string(),
            name: "Favorites".to_string(),
            description: "best of".to_string(),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn test_video(id: &str) -> video::Model {
        video::Model {
            id: id.to_string(),
            owner_id: "u1".to_string(),
            video_url: "/media/v.mp4".to_string(),
            thumbnail_url: "/media/t.png".to_string(),
            title: "Test".to_string(),
            description: "desc".to_string(),
            duration: None,
            views: 0,
            is_published: true,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn membership(playlist_id: &str, video_id: &str) -> relation::Model {
        relation::Model {
            id: format!("m-{video_id}"),
            subject_id: playlist_id.to_string(),
            object_id: video_id.to_string(),
            kind: RelationKind::PlaylistVideo,
            created_at: Utc::now().into(),
        }
    }

    fn service(
        playlist_db: sea_orm::DatabaseConnection,
        video_db: sea_orm::DatabaseConnection,
        relation_db: sea_orm::DatabaseConnection,
    ) -> PlaylistService {
        PlaylistService::new(
            PlaylistRepository::new(Arc::new(playlist_db)),
            VideoRepository::new(Arc::new(video_db)),
            RelationService::new(RelationRepository::new(Arc::new(relation_db))),
        )
    }

    #[tokio::test]
    async fn test_create_requires_name_and_description() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        );

        let result = service.create("u1", "Favorites", "  ").await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_add_video_missing_playlist() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<playlist::Model>::new()])
                .into_connection(),
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        );

        let result = service.add_video("u1", "missing", "v1").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_add_video_readd_is_noop() {
        // The conflict-absorbed insert (0 rows) still returns the playlist
        // with its videos.
        let relation_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .append_query_results([vec![membership("p1", "v1")]])
            .into_connection();
        let video_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_video("v1")]])
            .append_query_results([[test_video("v1")]])
            .into_connection();
        let playlist_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_playlist("p1", "u1")]])
            .into_connection();

        let (playlist, videos) = service(playlist_db, video_db, relation_db)
            .add_video("u1", "p1", "v1")
            .await
            .unwrap();

        assert_eq!(playlist.id, "p1");
        assert_eq!(videos.len(), 1);
    }

    #[tokio::test]
    async fn test_remove_video_absent_is_noop() {
        let relation_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .append_query_results([Vec::<relation::Model>::new()])
            .into_connection();
        let playlist_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_playlist("p1", "u1")]])
            .into_connection();
        let video_db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let (_, videos) = service(playlist_db, video_db, relation_db)
            .remove_video("u1", "p1", "v1")
            .await
            .unwrap();

        assert!(videos.is_empty());
    }

    #[tokio::test]
    async fn test_mutations_are_owner_gated() {
        let playlist_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_playlist("p1", "u1")]])
            .into_connection();

        let result = service(
            playlist_db,
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        )
        .add_video("intruder", "p1", "v1")
        .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_update_requires_some_change() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        );

        let result = service.update("u1", "p1", None, None).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
