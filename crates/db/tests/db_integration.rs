//! Database integration tests.
//!
//! These tests require a running `PostgreSQL` instance.
//! Run with: `cargo test --test db_integration -- --ignored`
//!
//! Environment variables:
//!   `TEST_DB_HOST` (default: localhost)
//!   `TEST_DB_PORT` (default: 5433)
//!   `TEST_DB_USER` (default: `vidtube_test`)
//!   `TEST_DB_PASSWORD` (default: `vidtube_test`)
//!   `TEST_DB_NAME` (default: `vidtube_test`)

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
};
use vidtube_common::IdGenerator;
use vidtube_db::entities::relation::{self, RelationKind};
use vidtube_db::repositories::RelationRepository;
use vidtube_db::test_utils::{TestDatabase, TestDbConfig};

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_database_connection() {
    let result = TestDatabase::new().await;
    assert!(result.is_ok(), "Failed to connect: {:?}", result.err());
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_migrations_apply_cleanly() {
    let db = TestDatabase::create_unique()
        .await
        .expect("Failed to create test database");

    let result = vidtube_db::migrate(db.connection()).await;
    assert!(result.is_ok(), "Migration failed: {:?}", result.err());

    db.drop_database().await.expect("Failed to drop database");
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_database_cleanup() {
    let db = TestDatabase::new().await.expect("Failed to connect");
    let result = db.cleanup().await;
    assert!(result.is_ok(), "Cleanup failed: {:?}", result.err());
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_init_connects_with_pool_options() {
    use vidtube_common::config::{DatabaseConfig, MediaConfig, ServerConfig};

    let test_config = TestDbConfig::default();
    let config = vidtube_common::Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            url: "http://localhost".to_string(),
        },
        database: DatabaseConfig {
            url: test_config.database_url(),
            max_connections: 5,
            min_connections: 1,
        },
        media: MediaConfig {
            base_path: "./media".to_string(),
            base_url: "/media".to_string(),
        },
    };

    let conn = vidtube_db::init(&config)
        .await
        .expect("init failed to connect");
    conn.ping().await.expect("ping failed");
}

fn like_model(ids: &IdGenerator, subject_id: &str, object_id: &str) -> relation::ActiveModel {
    relation::ActiveModel {
        id: Set(ids.generate()),
        subject_id: Set(subject_id.to_string()),
        object_id: Set(object_id.to_string()),
        kind: Set(RelationKind::VideoLike),
        created_at: Set(Utc::now().into()),
    }
}

async fn tuple_count(conn: &DatabaseConnection, subject_id: &str, object_id: &str) -> u64 {
    relation::Entity::find()
        .filter(relation::Column::SubjectId.eq(subject_id))
        .filter(relation::Column::ObjectId.eq(object_id))
        .filter(relation::Column::Kind.eq(RelationKind::VideoLike))
        .count(conn)
        .await
        .expect("count query failed")
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires running PostgreSQL instance"]
async fn test_concurrent_toggles_keep_at_most_one_row() {
    const RACERS: usize = 8;

    let db = TestDatabase::create_unique()
        .await
        .expect("Failed to create test database");
    vidtube_db::migrate(db.connection())
        .await
        .expect("Migration failed");

    let TestDatabase { conn, config } = db;
    let conn = Arc::new(conn);
    let repo = RelationRepository::new(Arc::clone(&conn));
    let ids = IdGenerator::new();

    let subject = ids.generate();
    let object = ids.generate();

    // Racing inserts of the same tuple: the unique index lets exactly one
    // win, the rest are absorbed by ON CONFLICT DO NOTHING.
    let mut tasks = Vec::with_capacity(RACERS);
    for _ in 0..RACERS {
        let repo = repo.clone();
        let model = like_model(&ids, &subject, &object);
        tasks.push(tokio::spawn(async move { repo.insert_if_absent(model).await }));
    }
    let mut inserted = 0;
    for task in tasks {
        if task.await.unwrap().expect("insert failed") {
            inserted += 1;
        }
    }
    assert_eq!(inserted, 1, "exactly one racing insert may win");
    assert_eq!(tuple_count(&conn, &subject, &object).await, 1);

    // Racing full toggles: whatever interleaving the scheduler picks, the
    // table must never end up holding duplicate rows for the tuple.
    let mut tasks = Vec::with_capacity(RACERS);
    for _ in 0..RACERS {
        let repo = repo.clone();
        let model = like_model(&ids, &subject, &object);
        let (subject, object) = (subject.clone(), object.clone());
        tasks.push(tokio::spawn(async move {
            repo.delete_by_tuple(&subject, &object, RelationKind::VideoLike)
                .await?;
            repo.insert_if_absent(model).await
        }));
    }
    for task in tasks {
        task.await.unwrap().expect("toggle failed");
    }
    assert!(tuple_count(&conn, &subject, &object).await <= 1);

    // A final uncontended flip lands the tuple back in a known state.
    repo.delete_by_tuple(&subject, &object, RelationKind::VideoLike)
        .await
        .expect("delete failed");
    assert!(
        repo.insert_if_absent(like_model(&ids, &subject, &object))
            .await
            .expect("insert failed")
    );
    assert_eq!(tuple_count(&conn, &subject, &object).await, 1);

    drop(repo);
    let Ok(conn) = Arc::try_unwrap(conn) else {
        panic!("connection still shared");
    };
    TestDatabase { conn, config }
        .drop_database()
        .await
        .expect("Failed to drop database");
}

#[test]
fn test_config_from_env() {
    let config = TestDbConfig::default();
    assert!(!config.host.is_empty());
    assert!(config.port > 0);
    assert!(!config.username.is_empty());
    assert!(config.database_url().starts_with("postgres://"));
}
