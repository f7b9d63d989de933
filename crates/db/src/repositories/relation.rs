//! Relation repository.
//!
//! Persistent store for (subject, object, kind) triples. The write paths are
//! deliberately conditional: `insert_if_absent` relies on the unique index and
//! `ON CONFLICT DO NOTHING`, `delete_by_tuple` reports whether a row actually
//! went away. Together they let the toggle engine flip state without a
//! read-then-write race.

use std::sync::Arc;

use crate::entities::{
    Relation,
    relation::{self, RelationKind},
};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    sea_query::OnConflict,
};
use vidtube_common::{AppError, AppResult};

/// Relation repository for database operations.
#[derive(Clone)]
pub struct RelationRepository {
    db: Arc<DatabaseConnection>,
}

impl RelationRepository {
    /// Create a new relation repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a relation by its tuple.
    pub async fn find_by_tuple(
        &self,
        subject_id: &str,
        object_id: &str,
        kind: RelationKind,
    ) -> AppResult<Option<relation::Model>> {
        Relation::find()
            .filter(relation::Column::SubjectId.eq(subject_id))
            .filter(relation::Column::ObjectId.eq(object_id))
            .filter(relation::Column::Kind.eq(kind))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check whether a relation exists.
    pub async fn exists(
        &self,
        subject_id: &str,
        object_id: &str,
        kind: RelationKind,
    ) -> AppResult<bool> {
        Ok(self
            .find_by_tuple(subject_id, object_id, kind)
            .await?
            .is_some())
    }

    /// Insert a relation unless its tuple already exists.
    ///
    /// Returns `true` if a row was inserted, `false` if the unique index on
    /// (`subject_id`, `object_id`, `kind`) absorbed the write. Either way the
    /// relation exists afterwards.
    pub async fn insert_if_absent(&self, model: relation::ActiveModel) -> AppResult<bool> {
        let inserted = Relation::insert(model)
            .on_conflict(
                OnConflict::columns([
                    relation::Column::SubjectId,
                    relation::Column::ObjectId,
                    relation::Column::Kind,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(inserted > 0)
    }

    /// Delete a relation by its tuple. Returns `true` if a row was removed;
    /// deleting a missing tuple is a no-op.
    pub async fn delete_by_tuple(
        &self,
        subject_id: &str,
        object_id: &str,
        kind: RelationKind,
    ) -> AppResult<bool> {
        let deleted = Relation::delete_many()
            .filter(relation::Column::SubjectId.eq(subject_id))
            .filter(relation::Column::ObjectId.eq(object_id))
            .filter(relation::Column::Kind.eq(kind))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(deleted.rows_affected > 0)
    }

    /// Relations held by a subject, newest first.
    pub async fn find_by_subject(
        &self,
        subject_id: &str,
        kind: RelationKind,
    ) -> AppResult<Vec<relation::Model>> {
        Relation::find()
            .filter(relation::Column::SubjectId.eq(subject_id))
            .filter(relation::Column::Kind.eq(kind))
            .order_by_desc(relation::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Relations pointing at an object, newest first.
    pub async fn find_by_object(
        &self,
        object_id: &str,
        kind: RelationKind,
    ) -> AppResult<Vec<relation::Model>> {
        Relation::find()
            .filter(relation::Column::ObjectId.eq(object_id))
            .filter(relation::Column::Kind.eq(kind))
            .order_by_desc(relation::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count relations pointing at an object.
    pub async fn count_by_object(&self, object_id: &str, kind: RelationKind) -> AppResult<u64> {
        Relation::find()
            .filter(relation::Column::ObjectId.eq(object_id))
            .filter(relation::Column::Kind.eq(kind))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count relations pointing at any of the given objects.
    pub async fn count_by_objects(
        &self,
        object_ids: &[String],
        kind: RelationKind,
    ) -> AppResult<u64> {
        if object_ids.is_empty() {
            return Ok(0);
        }

        Relation::find()
            .filter(relation::Column::ObjectId.is_in(object_ids.iter().map(String::as_str)))
            .filter(relation::Column::Kind.eq(kind))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete all relations held by a subject. Returns the number removed.
    pub async fn delete_by_subject(
        &self,
        subject_id: &str,
        kind: RelationKind,
    ) -> AppResult<u64> {
        let deleted = Relation::delete_many()
            .filter(relation::Column::SubjectId.eq(subject_id))
            .filter(relation::Column::Kind.eq(kind))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(deleted.rows_affected)
    }

    /// Delete all relations pointing at an object. Returns the number removed.
    pub async fn delete_by_object(&self, object_id: &str, kind: RelationKind) -> AppResult<u64> {
        let deleted = Relation::delete_many()
            .filter(relation::Column::ObjectId.eq(object_id))
            .filter(relation::Column::Kind.eq(kind))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(deleted.rows_affected)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{ActiveValue::Set, DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_relation(
        id: &str,
        subject_id: &str,
        object_id: &str,
        kind: RelationKind,
    ) -> relation::Model {
        relation::Model {
            id: id.to_string(),
            subject_id: subject_id.to_string(),
            object_id: object_id.to_string(),
            kind,
            created_at: Utc::now().into(),
        }
    }

    fn active_model(id: &str, subject_id: &str, object_id: &str) -> relation::ActiveModel {
        relation::ActiveModel {
            id: Set(id.to_string()),
            subject_id: Set(subject_id.to_string()),
            object_id: Set(object_id.to_string()),
            kind: Set(RelationKind::VideoLike),
            created_at: Set(Utc::now().into()),
        }
    }

    #[tokio::test]
    async fn test_find_by_tuple_found() {
        let rel = create_test_relation("r1", "u1", "v1", RelationKind::VideoLike);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[rel.clone()]])
                .into_connection(),
        );

        let repo = RelationRepository::new(db);
        let result = repo
            .find_by_tuple("u1", "v1", RelationKind::VideoLike)
            .await
            .unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().subject_id, "u1");
    }

    #[tokio::test]
    async fn test_exists_false() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<relation::Model>::new()])
                .into_connection(),
        );

        let repo = RelationRepository::new(db);
        assert!(
            !repo
                .exists("u1", "v1", RelationKind::Subscription)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_insert_if_absent_inserted() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = RelationRepository::new(db);
        let inserted = repo
            .insert_if_absent(active_model("r1", "u1", "v1"))
            .await
            .unwrap();

        assert!(inserted);
    }

    #[tokio::test]
    async fn test_insert_if_absent_conflict_is_not_an_error() {
        // ON CONFLICT DO NOTHING reports zero affected rows when the tuple
        // already exists; the relation is still on afterwards.
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = RelationRepository::new(db);
        let inserted = repo
            .insert_if_absent(active_model("r1", "u1", "v1"))
            .await
            .unwrap();

        assert!(!inserted);
    }

    #[tokio::test]
    async fn test_delete_by_tuple_missing_is_noop() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = RelationRepository::new(db);
        let deleted = repo
            .delete_by_tuple("u1", "v1", RelationKind::VideoLike)
            .await
            .unwrap();

        assert!(!deleted);
    }

    #[tokio::test]
    async fn test_count_by_objects_empty_slice_skips_query() {
        // No query expectations appended: an empty id list must short-circuit.
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let repo = RelationRepository::new(db);
        let count = repo
            .count_by_objects(&[], RelationKind::VideoLike)
            .await
            .unwrap();

        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_find_by_subject() {
        let r1 = create_test_relation("r1", "u1", "v1", RelationKind::VideoLike);
        let r2 = create_test_relation("r2", "u1", "v2", RelationKind::VideoLike);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[r1, r2]])
                .into_connection(),
        );

        let repo = RelationRepository::new(db);
        let result = repo
            .find_by_subject("u1", RelationKind::VideoLike)
            .await
            .unwrap();

        assert_eq!(result.len(), 2);
    }
}
