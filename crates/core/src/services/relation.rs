//! Relation service.
//!
//! The toggle engine. A relation is a (subject, object, kind) tuple whose
//! existence is the boolean state; flipping it is a conditional delete
//! followed by a conditional insert, so two concurrent flips can never leave
//! more than one row behind.

use chrono::Utc;
use sea_orm::Set;
use vidtube_common::{AppError, AppResult, IdGenerator};
use vidtube_db::{
    entities::relation::{self, RelationKind},
    repositories::RelationRepository,
};

/// Outcome of a toggle: the state the relation is in afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleState {
    /// The relation now exists.
    On,
    /// The relation no longer exists.
    Off,
}

impl ToggleState {
    /// Whether the relation is active after the toggle.
    #[must_use]
    pub const fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

/// Relation service for toggle and lookup logic.
#[derive(Clone)]
pub struct RelationService {
    relation_repo: RelationRepository,
    id_gen: IdGenerator,
}

impl RelationService {
    /// Create a new relation service.
    #[must_use]
    pub fn new(relation_repo: RelationRepository) -> Self {
        Self {
            relation_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Flip the relation for a tuple and report the resulting state.
    ///
    /// The flip is race-free: the delete only reports `Off` when a row
    /// actually went away, and the insert goes through `ON CONFLICT DO
    /// NOTHING` against the unique tuple index, so a concurrent winner's row
    /// is absorbed rather than duplicated or treated as a failure.
    pub async fn toggle(
        &self,
        subject_id: &str,
        object_id: &str,
        kind: RelationKind,
    ) -> AppResult<ToggleState> {
        if kind == RelationKind::Subscription && subject_id == object_id {
            return Err(AppError::BadRequest(
                "Cannot subscribe to yourself".to_string(),
            ));
        }

        if self
            .relation_repo
            .delete_by_tuple(subject_id, object_id, kind)
            .await?
        {
            return Ok(ToggleState::Off);
        }

        self.activate(subject_id, object_id, kind).await?;
        Ok(ToggleState::On)
    }

    /// Ensure the relation exists. Returns `true` if this call created it.
    pub async fn activate(
        &self,
        subject_id: &str,
        object_id: &str,
        kind: RelationKind,
    ) -> AppResult<bool> {
        let model = relation::ActiveModel {
            id: Set(self.id_gen.generate()),
            subject_id: Set(subject_id.to_string()),
            object_id: Set(object_id.to_string()),
            kind: Set(kind),
            created_at: Set(Utc::now().into()),
        };

        self.relation_repo.insert_if_absent(model).await
    }

    /// Ensure the relation does not exist. Returns `true` if this call
    /// removed it; removing an absent relation is a success no-op.
    pub async fn deactivate(
        &self,
        subject_id: &str,
        object_id: &str,
        kind: RelationKind,
    ) -> AppResult<bool> {
        self.relation_repo
            .delete_by_tuple(subject_id, object_id, kind)
            .await
    }

    /// Whether the relation is currently active.
    pub async fn is_active(
        &self,
        subject_id: &str,
        object_id: &str,
        kind: RelationKind,
    ) -> AppResult<bool> {
        self.relation_repo.exists(subject_id, object_id, kind).await
    }

    /// IDs of the objects a subject is related to, newest first.
    pub async fn list_objects(
        &self,
        subject_id: &str,
        kind: RelationKind,
    ) -> AppResult<Vec<String>> {
        Ok(self
            .relation_repo
            .find_by_subject(subject_id, kind)
            .await?
            .into_iter()
            .map(|r| r.object_id)
            .collect())
    }

    /// IDs of the subjects related to an object, newest first.
    pub async fn list_subjects(
        &self,
        object_id: &str,
        kind: RelationKind,
    ) -> AppResult<Vec<String>> {
        Ok(self
            .relation_repo
            .find_by_object(object_id, kind)
            .await?
            .into_iter()
            .map(|r| r.subject_id)
            .collect())
    }

    /// Count relations pointing at an object.
    pub async fn count_for_object(&self, object_id: &str, kind: RelationKind) -> AppResult<u64> {
        self.relation_repo.count_by_object(object_id, kind).await
    }

    /// Count relations pointing at any of the given objects.
    pub async fn count_for_objects(
        &self,
        object_ids: &[String],
        kind: RelationKind,
    ) -> AppResult<u64> {
        self.relation_repo.count_by_objects(object_ids, kind).await
    }

    /// Count relations held by a subject.
    pub async fn count_for_subject(&self, subject_id: &str, kind: RelationKind) -> AppResult<u64> {
        Ok(self
            .relation_repo
            .find_by_subject(subject_id, kind)
            .await?
            .len() as u64)
    }

    /// Remove every relation held by a subject (entity deletion cleanup).
    pub async fn clear_subject(&self, subject_id: &str, kind: RelationKind) -> AppResult<u64> {
        self.relation_repo.delete_by_subject(subject_id, kind).await
    }

    /// Remove every relation pointing at an object (entity deletion cleanup).
    pub async fn clear_object(&self, object_id: &str, kind: RelationKind) -> AppResult<u64> {
        self.relation_repo.delete_by_object(object_id, kind).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn service(db: sea_orm::DatabaseConnection) -> RelationService {
        RelationService::new(RelationRepository::new(Arc::new(db)))
    }

    fn exec(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    #[tokio::test]
    async fn test_toggle_removes_existing_relation() {
        // Delete hits a row, so the toggle ends Off without inserting.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(1)])
            .into_connection();

        let state = service(db)
            .toggle("u1", "v1", RelationKind::VideoLike)
            .await
            .unwrap();

        assert_eq!(state, ToggleState::Off);
    }

    #[tokio::test]
    async fn test_toggle_creates_missing_relation() {
        // Delete misses, insert lands: On.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(0), exec(1)])
            .into_connection();

        let state = service(db)
            .toggle("u1", "v1", RelationKind::VideoLike)
            .await
            .unwrap();

        assert_eq!(state, ToggleState::On);
        assert!(state.is_on());
    }

    #[tokio::test]
    async fn test_toggle_concurrent_insert_still_reports_on() {
        // Delete misses and the insert is absorbed by the unique index
        // because a concurrent toggle won the race. The relation exists, so
        // the outcome is still On.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(0), exec(0)])
            .into_connection();

        let state = service(db)
            .toggle("u1", "v1", RelationKind::Subscription)
            .await
            .unwrap();

        assert_eq!(state, ToggleState::On);
    }

    #[tokio::test]
    async fn test_toggle_rejects_self_subscription_without_writes() {
        // No exec expectations appended: the guard must fire before any query.
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let result = service(db)
            .toggle("u1", "u1", RelationKind::Subscription)
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_self_like_is_allowed() {
        // The self guard only applies to subscriptions; liking your own
        // video is fine.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(0), exec(1)])
            .into_connection();

        let state = service(db)
            .toggle("u1", "u1", RelationKind::VideoLike)
            .await
            .unwrap();

        assert_eq!(state, ToggleState::On);
    }

    #[tokio::test]
    async fn test_deactivate_absent_is_noop() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(0)])
            .into_connection();

        let removed = service(db)
            .deactivate("p1", "v1", RelationKind::PlaylistVideo)
            .await
            .unwrap();

        assert!(!removed);
    }

    #[tokio::test]
    async fn test_list_objects_maps_object_ids() {
        let rows = vec![
            relation::Model {
                id: "r1".to_string(),
                subject_id: "u1".to_string(),
                object_id: "v2".to_string(),
                kind: RelationKind::VideoLike,
                created_at: Utc::now().into(),
            },
            relation::Model {
                id: "r2".to_string(),
                subject_id: "u1".to_string(),
                object_id: "v1".to_string(),
                kind: RelationKind::VideoLike,
                created_at: Utc::now().into(),
            },
        ];

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([rows])
            .into_connection();

        let ids = service(db)
            .list_objects("u1", RelationKind::VideoLike)
            .await
            .unwrap();

        assert_eq!(ids, vec!["v2".to_string(), "v1".to_string()]);
    }
}
