//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, DbErr, EntityTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use blogflow_core::domain::{Post, PostState, User};
use blogflow_core::error::RepoError;
use blogflow_core::ports::{BaseRepository, PostStore, UserRepository};

use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};

/// PostgreSQL user repository.
pub struct PostgresUserRepository {
    db: DbConn,
}

impl PostgresUserRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

/// PostgreSQL post store with optimistic versioning.
pub struct PostgresPostStore {
    db: DbConn,
}

impl PostgresPostStore {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

fn query_err(e: DbErr) -> RepoError {
    RepoError::Query(e.to_string())
}

fn write_err(e: DbErr) -> RepoError {
    let err_str = e.to_string();
    if err_str.contains("duplicate") || err_str.contains("unique") {
        RepoError::Constraint("Entity already exists".to_string())
    } else {
        RepoError::Query(err_str)
    }
}

/// Mask an email for logging to avoid PII in logs.
fn mask_email(email: &str) -> String {
    match email.find('@') {
        Some(at_pos) => {
            let (local, domain) = email.split_at(at_pos);
            let masked_local = match local.chars().next() {
                Some(first) if local.len() > 1 => format!("{}***", first),
                _ => "***".to_string(),
            };
            format!("{}{}", masked_local, domain)
        }
        None => "***".to_string(),
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for PostgresUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let result = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }

    async fn save(&self, entity: User) -> Result<User, RepoError> {
        let exists = UserEntity::find_by_id(entity.id)
            .one(&self.db)
            .await
            .map_err(query_err)?
            .is_some();

        let active_model: user::ActiveModel = entity.into();
        let result = if exists {
            active_model.update(&self.db).await
        } else {
            active_model.insert(&self.db).await
        };

        Ok(result.map_err(write_err)?.into())
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl PostStore for PostgresPostStore {
    async fn load(&self, id: Uuid) -> Result<Post, RepoError> {
        PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?
            .map(Into::into)
            .ok_or(RepoError::NotFound)
    }

    async fn save(&self, mut post: Post) -> Result<Post, RepoError> {
        let expected = post.version;
        post.version = expected + 1;
        let active_model: post::ActiveModel = post.clone().into();

        // Version 0 means the post has never been stored.
        if expected == 0 {
            PostEntity::insert(active_model)
                .exec_without_returning(&self.db)
                .await
                .map_err(|e| match write_err(e) {
                    RepoError::Constraint(_) => {
                        RepoError::Conflict(format!("post {} already exists", post.id))
                    }
                    other => other,
                })?;
            return Ok(post);
        }

        let result = PostEntity::update_many()
            .set(active_model)
            .filter(post::Column::Id.eq(post.id))
            .filter(post::Column::Version.eq(expected))
            .exec(&self.db)
            .await
            .map_err(write_err)?;

        if result.rows_affected == 0 {
            tracing::debug!(post_id = %post.id, version = expected, "Stale post save rejected");
            return Err(RepoError::Conflict(format!(
                "post {} was modified or removed since version {}",
                post.id, expected
            )));
        }

        Ok(post)
    }

    async fn list_by_state(&self, state: PostState) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::State.eq(post::State::from(state)))
            .order_by_desc(post::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn list_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::AuthorId.eq(author_id))
            .order_by_desc(post::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}
