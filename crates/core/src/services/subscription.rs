//! Subscription service.
//!
//! A subscription is a relation from a subscriber to a channel (another
//! user). Self-subscription is rejected before any lookup runs.

use vidtube_common::{AppError, AppResult};
use vidtube_db::{
    entities::{relation::RelationKind, user},
    repositories::UserRepository,
};

use crate::services::relation::{RelationService, ToggleState};

/// Subscription service for business logic.
#[derive(Clone)]
pub struct SubscriptionService {
    relation: RelationService,
    user_repo: UserRepository,
}

impl SubscriptionService {
    /// Create a new subscription service.
    #[must_use]
    pub const fn new(relation: RelationService, user_repo: UserRepository) -> Self {
        Self {
            relation,
            user_repo,
        }
    }

    /// Toggle the subscriber's subscription to a channel.
    pub async fn toggle(&self, subscriber_id: &str, channel_id: &str) -> AppResult<ToggleState> {
        if subscriber_id == channel_id {
            return Err(AppError::BadRequest(
                "Cannot subscribe to yourself".to_string(),
            ));
        }

        self.user_repo.get_by_id(channel_id).await?;

        self.relation
            .toggle(subscriber_id, channel_id, RelationKind::Subscription)
            .await
    }

    /// Users subscribed to a channel, newest subscription first.
    pub async fn subscribers(&self, channel_id: &str) -> AppResult<Vec<user::Model>> {
        self.user_repo.get_by_id(channel_id).await?;

        let ids = self
            .relation
            .list_subjects(channel_id, RelationKind::Subscription)
            .await?;

        let mut users = self.user_repo.find_by_ids(&ids).await?;
        users.sort_by_key(|u| ids.iter().position(|id| *id == u.id));
        Ok(users)
    }

    /// Channels a user subscribes to, newest subscription first.
    pub async fn subscribed_channels(&self, subscriber_id: &str) -> AppResult<Vec<user::Model>> {
        let ids = self
            .relation
            .list_objects(subscriber_id, RelationKind::Subscription)
            .await?;

        let mut users = self.user_repo.find_by_ids(&ids).await?;
        users.sort_by_key(|u| ids.iter().position(|id| *id == u.id));
        Ok(users)
    }

    /// Number of subscribers of a channel.
    pub async fn subscriber_count(&self, channel_id: &str) -> AppResult<u64> {
        self.relation
            .count_for_object(channel_id, RelationKind::Subscription)
            .await
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

    fn test_user(id: &str, username: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            full_name: "Test User".to_string(),
            password_hash: "$argon2id$test".to_string(),
            avatar_url: "/media/a.png".to_string(),
            cover_image_url: None,
            token: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn exec(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    #[tokio::test]
    async fn test_self_subscription_rejected_before_any_query() {
        // Neither mock carries expectations; the guard must fire first.
        let relation_db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let user_db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let service = SubscriptionService::new(
            RelationService::new(RelationRepository::new(Arc::new(relation_db))),
            UserRepository::new(Arc::new(user_db)),
        );

        let result = service.toggle("u1", "u1").await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_toggle_missing_channel() {
        let relation_db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let user_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();

        let service = SubscriptionService::new(
            RelationService::new(RelationRepository::new(Arc::new(relation_db))),
            UserRepository::new(Arc::new(user_db)),
        );

        let result = service.toggle("u1", "missing").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_toggle_subscribes() {
        let relation_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(0), exec(1)])
            .into_connection();
        let user_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_user("u2", "channel")]])
            .into_connection();

        let service = SubscriptionService::new(
            RelationService::new(RelationRepository::new(Arc::new(relation_db))),
            UserRepository::new(Arc::new(user_db)),
        );

        let state = service.toggle("u1", "u2").await.unwrap();
        assert_eq!(state, ToggleState::On);
    }

    #[tokio::test]
    async fn test_toggle_unsubscribes() {
        let relation_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(1)])
            .into_connection();
        let user_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_user("u2", "channel")]])
            .into_connection();

        let service = SubscriptionService::new(
            RelationService::new(RelationRepository::new(Arc::new(relation_db))),
            UserRepository::new(Arc::new(user_db)),
        );

        let state = service.toggle("u1", "u2").await.unwrap();
        assert_eq!(state, ToggleState::Off);
    }

    #[tokio::test]
    async fn test_subscribed_channels() {
        let subs = vec![relation::Model {
            id: "r1".to_string(),
            subject_id: "u1".to_string(),
            object_id: "u2".to_string(),
            kind: RelationKind::Subscription,
            created_at: Utc::now().into(),
        }];
        let relation_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([subs])
            .into_connection();
        let user_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_user("u2", "channel")]])
            .into_connection();

        let service = SubscriptionService::new(
            RelationService::new(RelationRepository::new(Arc::new(relation_db))),
            UserRepository::new(Arc::new(user_db)),
        );

        let channels = service.subscribed_channels("u1").await.unwrap();
        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0].username, "channel");
    }
}
