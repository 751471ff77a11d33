use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Principal;
use crate::error::DomainError;

/// Maximum length of a post title.
pub const MAX_TITLE_LEN: usize = 255;

/// Editorial state of a post.
///
/// Stored and serialized with the labels used by the editorial UI
/// (`"draft"`, `"waiting approval"`, `"published"`).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum PostState {
    #[default]
    #[serde(rename = "draft")]
    Draft,
    #[serde(rename = "waiting approval")]
    WaitingApproval,
    #[serde(rename = "published")]
    Published,
}

impl PostState {
    pub const ALL: [PostState; 3] = [
        PostState::Draft,
        PostState::WaitingApproval,
        PostState::Published,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PostState::Draft => "draft",
            PostState::WaitingApproval => "waiting approval",
            PostState::Published => "published",
        }
    }
}

impl fmt::Display for PostState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostState {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(PostState::Draft),
            "waiting approval" => Ok(PostState::WaitingApproval),
            "published" => Ok(PostState::Published),
            other => Err(DomainError::Validation(format!(
                "unknown post state '{}'",
                other
            ))),
        }
    }
}

/// Post entity - a blog post moving through the editorial workflow.
///
/// `state` is only writable from inside the domain layer; callers change it
/// through [`PostWorkflow`](crate::workflow::PostWorkflow).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    state: PostState,
    /// Optimistic concurrency counter, managed by the post store.
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new draft post owned by `author_id`.
    pub fn new(author_id: Uuid, title: String, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            content,
            state: PostState::Draft,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a post from persisted fields.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: Uuid,
        author_id: Uuid,
        title: String,
        content: String,
        state: PostState,
        version: i64,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            author_id,
            title,
            content,
            state,
            version,
            created_at,
            updated_at,
        }
    }

    pub fn state(&self) -> PostState {
        self.state
    }

    pub fn is_published(&self) -> bool {
        self.state == PostState::Published
    }

    pub fn is_authored_by(&self, principal: &Principal) -> bool {
        self.author_id == principal.id
    }

    /// Replace title and content. Does not touch the workflow state.
    pub fn revise(&mut self, title: String, content: String) -> Result<(), DomainError> {
        validate_body(&title, &content)?;
        self.title = title;
        self.content = content;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub(crate) fn set_state(&mut self, state: PostState) {
        self.state = state;
        self.updated_at = Utc::now();
    }
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} by: {}", self.title, self.author_id)
    }
}

/// Check a title/content pair before it is stored on a post.
pub fn validate_body(title: &str, content: &str) -> Result<(), DomainError> {
    if title.trim().is_empty() {
        return Err(DomainError::Validation("Title is required".to_string()));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(DomainError::Validation(format!(
            "Title must be at most {} characters",
            MAX_TITLE_LEN
        )));
    }
    if content.trim().is_empty() {
        return Err(DomainError::Validation("Content is required".to_string()));
    }
    Ok(())
}
