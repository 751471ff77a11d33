//! Post use cases: the load -> workflow -> save cycle and listings.

use std::collections::BTreeSet;
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Post, PostState, Principal, validate_body};
use crate::error::{DomainError, RepoError, WorkflowError};
use crate::ports::PostStore;
use crate::workflow::{PostWorkflow, TransitionName};

/// Application service for posts.
///
/// Workflow failures come back as [`DomainError::Workflow`] and storage
/// failures as [`DomainError::Store`] (or `NotFound`); the two never mix.
#[derive(Clone)]
pub struct PostService {
    store: Arc<dyn PostStore>,
    workflow: PostWorkflow,
}

impl PostService {
    pub fn new(store: Arc<dyn PostStore>, workflow: PostWorkflow) -> Self {
        Self { store, workflow }
    }

    /// Create a draft authored by `principal`.
    pub async fn create(
        &self,
        principal: &Principal,
        title: String,
        content: String,
    ) -> Result<Post, DomainError> {
        validate_body(&title, &content)?;
        let post = Post::new(principal.id, title, content);
        Ok(self.store.save(post).await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<Post, DomainError> {
        self.store.load(id).await.map_err(|e| not_found(e, id))
    }

    /// Fetch a post as seen by `viewer`.
    ///
    /// Unpublished posts are only visible to their author and to admins;
    /// anyone else gets `NotFound`.
    pub async fn view(&self, id: Uuid, viewer: Option<&Principal>) -> Result<Post, DomainError> {
        let post = self.get(id).await?;
        let visible = post.is_published()
            || viewer.is_some_and(|p| p.is_admin || post.is_authored_by(p));

        if !visible {
            return Err(DomainError::NotFound {
                entity_type: "Post",
                id,
            });
        }
        Ok(post)
    }

    /// Fire the transition called `name` and persist the result.
    ///
    /// The post is loaded under the same visibility rule as [`view`](Self::view).
    /// `Edit` is reserved for the author.
    pub async fn transition(
        &self,
        id: Uuid,
        name: &str,
        principal: &Principal,
    ) -> Result<Post, DomainError> {
        let name: TransitionName = name.parse()?;
        let mut post = self.view(id, Some(principal)).await?;

        if name == TransitionName::Edit && !post.is_authored_by(principal) {
            return Err(DomainError::Forbidden);
        }

        let transition = self.workflow.apply(&mut post, name, principal)?;
        let post = self.store.save(post).await?;
        self.workflow.notify(&post, transition, principal);

        Ok(post)
    }

    /// Replace title and content on behalf of the author.
    ///
    /// A post waiting for approval goes back to draft through the `Edit`
    /// transition. Published posts have to be unpublished first.
    pub async fn revise(
        &self,
        id: Uuid,
        principal: &Principal,
        title: String,
        content: String,
    ) -> Result<Post, DomainError> {
        let mut post = self.view(id, Some(principal)).await?;
        if !post.is_authored_by(principal) {
            return Err(DomainError::Forbidden);
        }
        validate_body(&title, &content)?;

        let transition = match post.state() {
            PostState::Draft => None,
            PostState::WaitingApproval => Some(self.workflow.apply(
                &mut post,
                TransitionName::Edit,
                principal,
            )?),
            PostState::Published => {
                return Err(WorkflowError::InvalidStateTransition {
                    actual: PostState::Published,
                    required: PostState::Draft,
                }
                .into());
            }
        };

        post.revise(title, content)?;
        let post = self.store.save(post).await?;
        if let Some(transition) = transition {
            self.workflow.notify(&post, transition, principal);
        }

        Ok(post)
    }

    /// The post as seen by `principal` and the transitions they may fire on
    /// it right now. `Edit` is only offered to the author.
    pub async fn available(
        &self,
        id: Uuid,
        principal: &Principal,
    ) -> Result<(Post, BTreeSet<TransitionName>), DomainError> {
        let post = self.view(id, Some(principal)).await?;
        let mut names = self.workflow.available_transitions(&post, principal);
        if !post.is_authored_by(principal) {
            names.remove(&TransitionName::Edit);
        }
        Ok((post, names))
    }

    pub async fn list_published(&self) -> Result<Vec<Post>, DomainError> {
        Ok(self.store.list_by_state(PostState::Published).await?)
    }

    pub async fn list_awaiting_approval(&self) -> Result<Vec<Post>, DomainError> {
        Ok(self.store.list_by_state(PostState::WaitingApproval).await?)
    }

    pub async fn list_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, DomainError> {
        Ok(self.store.list_by_author(author_id).await?)
    }
}

fn not_found(err: RepoError, id: Uuid) -> DomainError {
    match err {
        RepoError::NotFound => DomainError::NotFound {
            entity_type: "Post",
            id,
        },
        other => DomainError::Store(other),
    }
}
