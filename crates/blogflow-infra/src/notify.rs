//! Editorial notifications emitted when posts change state.

use blogflow_core::domain::{Post, Principal};
use blogflow_core::workflow::{Transition, TransitionHook, TransitionName};

/// Transition hook that reports editorial events through `tracing`.
///
/// Submissions, approvals and rejections are logged at `info`; the other
/// transitions at `debug`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl TransitionHook for TracingNotifier {
    fn on_transition(&self, post: &Post, transition: &Transition, principal: &Principal) {
        let message = match transition.name {
            TransitionName::Submit => "Post needs approval",
            TransitionName::Approve => "Post approved",
            TransitionName::Disapprove => "Post disapproved",
            TransitionName::Edit | TransitionName::Unpublish => {
                tracing::debug!(
                    post_id = %post.id,
                    transition = %transition.name,
                    from = %transition.source,
                    to = %transition.target,
                    actor = %principal.id,
                    "Post state changed"
                );
                return;
            }
        };

        tracing::info!(
            post_id = %post.id,
            author_id = %post.author_id,
            title = %post.title,
            actor = %principal.id,
            "{}",
            message
        );
    }
}
