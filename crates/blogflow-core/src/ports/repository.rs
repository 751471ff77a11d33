use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Post, PostState, User};
use crate::error::RepoError;

/// Generic repository trait: lookup by id and upsert.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Find a user by their username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;
}

/// Post storage.
///
/// `save` must be a compare-and-swap on [`Post::version`]: it succeeds only
/// when the stored version equals the one the post was loaded with, and
/// returns the post with its version incremented. A stale save fails with
/// [`RepoError::Conflict`]. Saving a post that was never stored inserts it.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Load a post, or `RepoError::NotFound`.
    async fn load(&self, id: Uuid) -> Result<Post, RepoError>;

    /// Insert or update a post.
    async fn save(&self, post: Post) -> Result<Post, RepoError>;

    /// Posts in the given state, newest first.
    async fn list_by_state(&self, state: PostState) -> Result<Vec<Post>, RepoError>;

    /// Posts written by `author_id`, newest first.
    async fn list_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError>;
}
