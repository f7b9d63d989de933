//! Tweet service.

use sea_orm::Set;
use vidtube_common::{AppError, AppResult, IdGenerator};
use vidtube_db::{
    entities::{relation::RelationKind, tweet},
    repositories::{TweetRepository, UserRepository},
};

use crate::services::relation::RelationService;

/// Tweet service for business logic.
#[derive(Clone)]
pub struct TweetService {
    tweet_repo: TweetRepository,
    user_repo: UserRepository,
    relation: RelationService,
    id_gen: IdGenerator,
}

impl TweetService {
    /// Create a new tweet service.
    #[must_use]
    pub fn new(
        tweet_repo: TweetRepository,
        user_repo: UserRepository,
        relation: RelationService,
    ) -> Self {
        Self {
            tweet_repo,
            user_repo,
            relation,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a tweet.
    pub async fn create(&self, user_id: &str, content: &str) -> AppResult<tweet::Model> {
        if content.trim().is_empty() {
            return Err(AppError::Validation(
                "Tweet content is required".to_string(),
            ));
        }

        let model = tweet::ActiveModel {
            id: Set(self.id_gen.generate()),
            owner_id: Set(user_id.to_string()),
            content: Set(content.to_string()),
            ..Default::default()
        };

        self.tweet_repo.create(model).await
    }

    /// Tweets of a user, newest first.
    pub async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<tweet::Model>> {
        self.user_repo.get_by_id(user_id).await?;
        self.tweet_repo.find_by_owner(user_id).await
    }

    /// Rewrite a tweet. Owner-gated.
    pub async fn update(&self, user_id: &str, id: &str, content: &str) -> AppResult<tweet::Model> {
        if content.trim().is_empty() {
            return Err(AppError::Validation(
                "Tweet content is required".to_string(),
            ));
        }

        let tweet = self.tweet_repo.get_by_id(id).await?;
        Self::ensure_owner(&tweet, user_id)?;

        let mut active: tweet::ActiveModel = tweet.into();
        active.content = Set(content.to_string());
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        self.tweet_repo.update(active).await
    }

    /// Delete a tweet and its likes. Owner-gated.
    pub async fn delete(&self, user_id: &str, id: &str) -> AppResult<()> {
        let tweet = self.tweet_repo.get_by_id(id).await?;
        Self::ensure_owner(&tweet, user_id)?;

        self.tweet_repo.delete_by_id(id).await?;
        self.relation
            .clear_object(id, RelationKind::TweetLike)
            .await?;

        Ok(())
    }

    fn ensure_owner(tweet: &tweet::Model, user_id: &str) -> AppResult<()> {
        if tweet.owner_id == user_id {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Only the owner can modify this tweet".to_string(),
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
    use vidtube_db::entities::user;
    use vidtube_db::repositories::RelationRepository;

    fn test_tweet(id: &str, owner_id: &str) -> tweet::Model {
        tweet::Model {
            id: id.to_string(),
            owner_id: owner_id.to_string(),
            content: "hello".to_string(),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn service(
        tweet_db: sea_orm::DatabaseConnection,
        user_db: sea_orm::DatabaseConnection,
    ) -> TweetService {
        let relation_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        TweetService::new(
            TweetRepository::new(Arc::new(tweet_db)),
            UserRepository::new(Arc::new(user_db)),
            RelationService::new(RelationRepository::new(Arc::new(relation_db))),
        )
    }

    #[tokio::test]
    async fn test_create_requires_content() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        );

        let result = service.create("u1", "").await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_list_by_user_missing_user() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let result = service.list_by_user("missing").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_rejects_non_owner() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_tweet("t1", "u1")]])
                .into_connection(),
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        );

        let result = service.delete("intruder", "t1").await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_delete_owner_succeeds() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_tweet("t1", "u1")]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        );

        service.delete("u1", "t1").await.unwrap();
    }
}
