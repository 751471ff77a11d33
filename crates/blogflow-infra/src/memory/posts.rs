use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use blogflow_core::domain::{Post, PostState};
use blogflow_core::error::RepoError;
use blogflow_core::ports::PostStore;

/// In-memory post store using a HashMap behind an async RwLock.
///
/// Version checks and writes happen under one write guard, so concurrent
/// saves of the same post are serialized.
#[derive(Default)]
pub struct InMemoryPostStore {
    posts: RwLock<HashMap<Uuid, Post>>,
}

impl InMemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn list_where<F>(&self, keep: F) -> Vec<Post>
    where
        F: Fn(&Post) -> bool,
    {
        let posts = self.posts.read().await;
        let mut found: Vec<Post> = posts.values().filter(|p| keep(p)).cloned().collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        found
    }
}

#[async_trait]
impl PostStore for InMemoryPostStore {
    async fn load(&self, id: Uuid) -> Result<Post, RepoError> {
        let posts = self.posts.read().await;
        posts.get(&id).cloned().ok_or(RepoError::NotFound)
    }

    async fn save(&self, mut post: Post) -> Result<Post, RepoError> {
        let mut posts = self.posts.write().await;

        let stored_version = posts.get(&post.id).map(|p| p.version).unwrap_or(0);
        if stored_version != post.version {
            tracing::debug!(
                post_id = %post.id,
                stored = stored_version,
                loaded = post.version,
                "Stale post save rejected"
            );
            return Err(RepoError::Conflict(format!(
                "post {} was modified since version {}",
                post.id, post.version
            )));
        }

        post.version += 1;
        posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn list_by_state(&self, state: PostState) -> Result<Vec<Post>, RepoError> {
        Ok(self.list_where(|p| p.state() == state).await)
    }

    async fn list_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        Ok(self.list_where(|p| p.author_id == author_id).await)
    }
}
