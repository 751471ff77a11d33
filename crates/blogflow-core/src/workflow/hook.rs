use crate::domain::{Post, Principal};

use super::Transition;

/// Side effect attached to successful transitions (notifications, audit).
///
/// Called only for transitions that passed every check, with the post already
/// in the transition's target state. Hooks cannot fail.
pub trait TransitionHook: Send + Sync {
    fn on_transition(&self, post: &Post, transition: &Transition, principal: &Principal);
}

/// Hook that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHook;

impl TransitionHook for NoopHook {
    fn on_transition(&self, _post: &Post, _transition: &Transition, _principal: &Principal) {}
}
