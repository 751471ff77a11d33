//! Editorial workflow for posts.
//!
//! A post moves `Draft -> WaitingApproval -> Published` and back to `Draft`.
//! Every move is described by an entry of [`TRANSITIONS`]; [`PostWorkflow`]
//! is the single dispatcher that validates and applies them.

mod hook;
mod table;

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::domain::{Post, PostState, Principal};
use crate::error::WorkflowError;

pub use hook::{NoopHook, TransitionHook};
pub use table::{Guard, Permission, TRANSITIONS, Transition, TransitionName};

/// State machine driving posts through the editorial workflow.
///
/// The workflow only mutates the in-memory post. Persisting it, and making
/// the load/save cycle atomic, is up to the post store.
#[derive(Clone)]
pub struct PostWorkflow {
    hook: Arc<dyn TransitionHook>,
}

impl PostWorkflow {
    pub fn new() -> Self {
        Self::with_hook(Arc::new(NoopHook))
    }

    /// Build a workflow that runs `hook` on every successful transition.
    pub fn with_hook(hook: Arc<dyn TransitionHook>) -> Self {
        Self { hook }
    }

    /// Attempt the transition called `name` on behalf of `principal`.
    ///
    /// On failure the post is left untouched and the hook is not run.
    pub fn attempt(
        &self,
        post: &mut Post,
        name: &str,
        principal: &Principal,
    ) -> Result<PostState, WorkflowError> {
        let name: TransitionName = name.parse()?;
        self.attempt_transition(post, name, principal)
    }

    /// Typed variant of [`attempt`](Self::attempt).
    pub fn attempt_transition(
        &self,
        post: &mut Post,
        name: TransitionName,
        principal: &Principal,
    ) -> Result<PostState, WorkflowError> {
        let transition = self.apply(post, name, principal)?;
        self.notify(post, transition, principal);
        Ok(transition.target)
    }

    /// Check and apply a transition without running the hook.
    ///
    /// Callers that persist the post report it with [`notify`](Self::notify)
    /// once the write succeeded.
    pub fn apply(
        &self,
        post: &mut Post,
        name: TransitionName,
        principal: &Principal,
    ) -> Result<&'static Transition, WorkflowError> {
        let transition = Transition::get(name);
        check(transition, post, principal)?;
        post.set_state(transition.target);
        Ok(transition)
    }

    /// Run the hook for a transition already applied to `post`.
    pub fn notify(&self, post: &Post, transition: &Transition, principal: &Principal) {
        self.hook.on_transition(post, transition, principal);
    }

    /// Names of every transition `principal` could fire on `post` right now.
    pub fn available_transitions(
        &self,
        post: &Post,
        principal: &Principal,
    ) -> BTreeSet<TransitionName> {
        TRANSITIONS
            .iter()
            .filter(|t| check(t, post, principal).is_ok())
            .map(|t| t.name)
            .collect()
    }
}

impl Default for PostWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

/// Guard first, then permission. A principal only learns about
/// authorization once the post is in the right state.
fn check(
    transition: &Transition,
    post: &Post,
    principal: &Principal,
) -> Result<(), WorkflowError> {
    if !(transition.guard)(post) {
        return Err(WorkflowError::InvalidStateTransition {
            actual: post.state(),
            required: transition.source,
        });
    }

    if !(transition.permission)(post, principal) {
        return Err(WorkflowError::PermissionDenied);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use uuid::Uuid;

    use super::*;

    struct Users {
        author: Principal,
        other: Principal,
        admin: Principal,
    }

    fn users() -> Users {
        Users {
            author: Principal::user(Uuid::new_v4()),
            other: Principal::user(Uuid::new_v4()),
            admin: Principal::admin(Uuid::new_v4()),
        }
    }

    fn post_in(state: PostState, author: &Principal) -> Post {
        let now = chrono::Utc::now();
        Post::restore(
            Uuid::new_v4(),
            author.id,
            "Title".into(),
            "Content".into(),
            state,
            0,
            now,
            now,
        )
    }

    #[derive(Default)]
    struct RecordingHook {
        seen: Mutex<Vec<(TransitionName, PostState)>>,
    }

    impl TransitionHook for RecordingHook {
        fn on_transition(&self, post: &Post, transition: &Transition, _principal: &Principal) {
            self.seen
                .lock()
                .unwrap()
                .push((transition.name, post.state()));
        }
    }

    #[test]
    fn test_submit_then_submit_again() {
        let u = users();
        let workflow = PostWorkflow::new();
        let mut post = Post::new(u.author.id, "Title".into(), "Content".into());

        let state = workflow.attempt(&mut post, "Submit", &u.author).unwrap();
        assert_eq!(state, PostState::WaitingApproval);
        assert_eq!(post.state(), PostState::WaitingApproval);

        let err = workflow.attempt(&mut post, "Submit", &u.author).unwrap_err();
        assert_eq!(
            err,
            WorkflowError::InvalidStateTransition {
                actual: PostState::WaitingApproval,
                required: PostState::Draft,
            }
        );
        assert_eq!(post.state(), PostState::WaitingApproval);
    }

    #[test]
    fn test_approve_requires_admin() {
        let u = users();
        let workflow = PostWorkflow::new();
        let mut post = post_in(PostState::WaitingApproval, &u.author);

        let err = workflow.attempt(&mut post, "Approve", &u.author).unwrap_err();
        assert_eq!(err, WorkflowError::PermissionDenied);
        assert_eq!(post.state(), PostState::WaitingApproval);

        let state = workflow.attempt(&mut post, "Approve", &u.admin).unwrap();
        assert_eq!(state, PostState::Published);
    }

    #[test]
    fn test_unpublish_by_author_or_admin_only() {
        let u = users();
        let workflow = PostWorkflow::new();
        let mut post = post_in(PostState::Published, &u.author);

        let err = workflow.attempt(&mut post, "Unpublish", &u.other).unwrap_err();
        assert_eq!(err, WorkflowError::PermissionDenied);
        assert_eq!(post.state(), PostState::Published);

        let state = workflow.attempt(&mut post, "Unpublish", &u.author).unwrap();
        assert_eq!(state, PostState::Draft);

        let mut post = post_in(PostState::Published, &u.author);
        assert_eq!(
            workflow.attempt(&mut post, "unpublish", &u.admin),
            Ok(PostState::Draft)
        );
    }

    #[test]
    fn test_unknown_transition() {
        let u = users();
        let workflow = PostWorkflow::new();
        let mut post = post_in(PostState::Draft, &u.author);

        let err = workflow.attempt(&mut post, "Publish", &u.admin).unwrap_err();
        assert_eq!(err, WorkflowError::UnknownTransition("Publish".to_string()));
        assert_eq!(post.state(), PostState::Draft);
    }

    #[test]
    fn test_disapprove_returns_to_draft() {
        let u = users();
        let workflow = PostWorkflow::new();
        let mut post = post_in(PostState::WaitingApproval, &u.author);

        assert_eq!(
            workflow.attempt(&mut post, "disapprove", &u.author),
            Err(WorkflowError::PermissionDenied)
        );
        assert_eq!(
            workflow.attempt(&mut post, "disapprove", &u.admin),
            Ok(PostState::Draft)
        );
    }

    #[test]
    fn test_edit_has_no_workflow_permission() {
        let u = users();
        let workflow = PostWorkflow::new();
        let mut post = post_in(PostState::WaitingApproval, &u.author);

        assert_eq!(
            workflow.attempt(&mut post, "edit", &u.other),
            Ok(PostState::Draft)
        );
    }

    #[test]
    fn test_guard_is_checked_before_permission() {
        let u = users();
        let workflow = PostWorkflow::new();
        let mut post = post_in(PostState::Draft, &u.author);

        // `other` lacks permission too, but the state mismatch is reported.
        let err = workflow.attempt(&mut post, "Approve", &u.other).unwrap_err();
        assert_eq!(
            err,
            WorkflowError::InvalidStateTransition {
                actual: PostState::Draft,
                required: PostState::WaitingApproval,
            }
        );
    }

    #[test]
    fn test_wrong_state_never_mutates() {
        let u = users();
        let workflow = PostWorkflow::new();

        for t in TRANSITIONS.iter() {
            for state in PostState::ALL.into_iter().filter(|s| *s != t.source) {
                for principal in [&u.author, &u.other, &u.admin] {
                    let mut post = post_in(state, &u.author);
                    let result = workflow.attempt_transition(&mut post, t.name, principal);
                    assert_eq!(
                        result,
                        Err(WorkflowError::InvalidStateTransition {
                            actual: state,
                            required: t.source,
                        })
                    );
                    assert_eq!(post.state(), state);
                }
            }
        }
    }

    #[test]
    fn test_successful_transition_lands_on_target() {
        let u = users();
        let workflow = PostWorkflow::new();

        for t in TRANSITIONS.iter() {
            for principal in [&u.author, &u.other, &u.admin] {
                let mut post = post_in(t.source, &u.author);
                if !(t.permission)(&post, principal) {
                    assert_eq!(
                        workflow.attempt_transition(&mut post, t.name, principal),
                        Err(WorkflowError::PermissionDenied)
                    );
                    assert_eq!(post.state(), t.source);
                    continue;
                }
                assert_eq!(
                    workflow.attempt_transition(&mut post, t.name, principal),
                    Ok(t.target)
                );
                assert_eq!(post.state(), t.target);
            }
        }
    }

    #[test]
    fn test_available_transitions_match_attempt() {
        let u = users();
        let workflow = PostWorkflow::new();

        for state in PostState::ALL {
            for principal in [&u.author, &u.other, &u.admin] {
                let post = post_in(state, &u.author);
                let available = workflow.available_transitions(&post, principal);

                let succeeding: BTreeSet<TransitionName> = TRANSITIONS
                    .iter()
                    .filter(|t| {
                        let mut copy = post.clone();
                        workflow.attempt_transition(&mut copy, t.name, principal).is_ok()
                    })
                    .map(|t| t.name)
                    .collect();

                assert_eq!(available, succeeding, "state {state}");
            }
        }
    }

    #[test]
    fn test_available_transitions_for_author_of_draft() {
        let u = users();
        let workflow = PostWorkflow::new();
        let post = post_in(PostState::Draft, &u.author);

        assert_eq!(
            workflow.available_transitions(&post, &u.author),
            BTreeSet::from([TransitionName::Submit])
        );
        assert!(workflow.available_transitions(&post, &u.admin).is_empty());
    }

    #[test]
    fn test_hook_runs_only_on_success() {
        let u = users();
        let hook = Arc::new(RecordingHook::default());
        let workflow = PostWorkflow::with_hook(hook.clone());
        let mut post = post_in(PostState::WaitingApproval, &u.author);

        let _ = workflow.attempt(&mut post, "approve", &u.other);
        let _ = workflow.attempt(&mut post, "submit", &u.author);
        workflow.attempt(&mut post, "approve", &u.admin).unwrap();

        let seen = hook.seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![(TransitionName::Approve, PostState::Published)]
        );
    }
}
