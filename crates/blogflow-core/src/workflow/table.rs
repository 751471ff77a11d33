//! The post transition table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::{Post, PostState, Principal};
use crate::error::WorkflowError;

/// Predicate over the post's current state.
pub type Guard = fn(&Post) -> bool;

/// Predicate deciding whether a principal may fire a transition on a post.
pub type Permission = fn(&Post, &Principal) -> bool;

/// Names of the editorial transitions.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TransitionName {
    Submit,
    Edit,
    Approve,
    Disapprove,
    Unpublish,
}

impl TransitionName {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionName::Submit => "submit",
            TransitionName::Edit => "edit",
            TransitionName::Approve => "approve",
            TransitionName::Disapprove => "disapprove",
            TransitionName::Unpublish => "unpublish",
        }
    }
}

impl fmt::Display for TransitionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransitionName {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TRANSITIONS
            .iter()
            .map(|t| t.name)
            .find(|name| name.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| WorkflowError::UnknownTransition(s.to_string()))
    }
}

/// A directed edge of the post workflow.
#[derive(Debug)]
pub struct Transition {
    pub name: TransitionName,
    pub source: PostState,
    pub target: PostState,
    pub guard: Guard,
    pub permission: Permission,
}

impl Transition {
    /// Look up the definition of a transition.
    pub fn get(name: TransitionName) -> &'static Transition {
        match name {
            TransitionName::Submit => &TRANSITIONS[0],
            TransitionName::Edit => &TRANSITIONS[1],
            TransitionName::Approve => &TRANSITIONS[2],
            TransitionName::Disapprove => &TRANSITIONS[3],
            TransitionName::Unpublish => &TRANSITIONS[4],
        }
    }
}

/// Every transition a post can take. Publication always goes through
/// `WaitingApproval` and an explicit approval.
pub static TRANSITIONS: [Transition; 5] = [
    Transition {
        name: TransitionName::Submit,
        source: PostState::Draft,
        target: PostState::WaitingApproval,
        guard: is_draft,
        permission: is_author,
    },
    // Edit rights on the post are checked by whoever invokes this.
    Transition {
        name: TransitionName::Edit,
        source: PostState::WaitingApproval,
        target: PostState::Draft,
        guard: is_waiting_approval,
        permission: anyone,
    },
    Transition {
        name: TransitionName::Approve,
        source: PostState::WaitingApproval,
        target: PostState::Published,
        guard: is_waiting_approval,
        permission: is_admin,
    },
    Transition {
        name: TransitionName::Disapprove,
        source: PostState::WaitingApproval,
        target: PostState::Draft,
        guard: is_waiting_approval,
        permission: is_admin,
    },
    Transition {
        name: TransitionName::Unpublish,
        source: PostState::Published,
        target: PostState::Draft,
        guard: is_published,
        permission: is_author_or_admin,
    },
];

fn is_draft(post: &Post) -> bool {
    post.state() == PostState::Draft
}

fn is_waiting_approval(post: &Post) -> bool {
    post.state() == PostState::WaitingApproval
}

fn is_published(post: &Post) -> bool {
    post.state() == PostState::Published
}

fn anyone(_post: &Post, _principal: &Principal) -> bool {
    true
}

fn is_author(post: &Post, principal: &Principal) -> bool {
    post.is_authored_by(principal)
}

fn is_admin(_post: &Post, principal: &Principal) -> bool {
    principal.is_admin
}

fn is_author_or_admin(post: &Post, principal: &Principal) -> bool {
    is_author(post, principal) || is_admin(post, principal)
}
