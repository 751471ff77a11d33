use chrono::Utc;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use uuid::Uuid;

use blogflow_core::domain::{Post, PostState};
use blogflow_core::error::RepoError;
use blogflow_core::ports::{PostStore, UserRepository};

use crate::database::entity::{post, user};
use crate::database::postgres_repo::{PostgresPostStore, PostgresUserRepository};

fn post_model(id: Uuid, state: post::State, version: i64) -> post::Model {
    let now = Utc::now();
    post::Model {
        id,
        author_id: Uuid::new_v4(),
        title: "Test Post".to_owned(),
        content: "Content".to_owned(),
        state,
        version,
        created_at: now.into(),
        updated_at: now.into(),
    }
}

fn exec_result(rows_affected: u64) -> MockExecResult {
    MockExecResult {
        last_insert_id: 0,
        rows_affected,
    }
}

#[tokio::test]
async fn test_load_post_with_state() {
    let post_id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post_model(
            post_id,
            post::State::WaitingApproval,
            3,
        )]])
        .into_connection();

    let store = PostgresPostStore::new(db);
    let post = store.load(post_id).await.unwrap();

    assert_eq!(post.id, post_id);
    assert_eq!(post.title, "Test Post");
    assert_eq!(post.state(), PostState::WaitingApproval);
    assert_eq!(post.version, 3);
}

#[tokio::test]
async fn test_load_missing_post() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![Vec::<post::Model>::new()])
        .into_connection();

    let store = PostgresPostStore::new(db);
    let result = store.load(Uuid::new_v4()).await;

    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_save_new_post_inserts_first_version() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![exec_result(1)])
        .into_connection();

    let store = PostgresPostStore::new(db);
    let post = Post::new(Uuid::new_v4(), "Title".into(), "Body".into());
    let saved = store.save(post).await.unwrap();

    assert_eq!(saved.version, 1);
    assert_eq!(saved.state(), PostState::Draft);
}

#[tokio::test]
async fn test_save_bumps_version() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![exec_result(1)])
        .into_connection();

    let store = PostgresPostStore::new(db);
    let post: Post = post_model(Uuid::new_v4(), post::State::Draft, 4).into();
    let saved = store.save(post).await.unwrap();

    assert_eq!(saved.version, 5);
}

#[tokio::test]
async fn test_stale_save_is_a_conflict() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![exec_result(0)])
        .into_connection();

    let store = PostgresPostStore::new(db);
    let post: Post = post_model(Uuid::new_v4(), post::State::WaitingApproval, 2).into();
    let result = store.save(post).await;

    assert!(matches!(result, Err(RepoError::Conflict(_))));
}

#[tokio::test]
async fn test_find_user_by_email() {
    let user_id = Uuid::new_v4();
    let now = Utc::now();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![user::Model {
            id: user_id,
            email: "ada@example.com".to_owned(),
            username: "ada".to_owned(),
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
            phone_number: String::new(),
            password_hash: "hash".to_owned(),
            is_staff: true,
            is_superuser: true,
            is_active: true,
            created_at: now.into(),
            updated_at: now.into(),
        }]])
        .into_connection();

    let repo = PostgresUserRepository::new(db);
    let user = repo
        .find_by_email("ada@example.com")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(user.id, user_id);
    assert!(user.principal().is_admin);
}
