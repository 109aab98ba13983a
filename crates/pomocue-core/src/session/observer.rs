use crate::timer::{DisplayUpdate, PeriodKind};

use super::controller::CompletionReason;

/// Notifications a running session sends to its front end.
///
/// Every method defaults to a no-op so a front end only implements what it
/// renders. Calls arrive on whatever thread drives the session's ticks.
pub trait SessionObserver: Send {
    /// Once per tick while running, and once when the session starts.
    fn on_display_update(&mut self, _update: &DisplayUpdate) {}

    /// A cue came due; called once per due cue.
    fn on_cue_fire(&mut self) {}

    /// A period ended and the next one begins.
    fn on_period_transition(&mut self, _from: PeriodKind, _to: PeriodKind) {}

    /// The run is over. Called exactly once per session.
    fn on_run_complete(&mut self, _reason: CompletionReason) {}

    /// Something went wrong that does not end the run.
    fn on_diagnostic(&mut self, _message: &str) {}
}

impl<T: SessionObserver + ?Sized> SessionObserver for Box<T> {
    fn on_display_update(&mut self, update: &DisplayUpdate) {
        (**self).on_display_update(update)
    }

    fn on_cue_fire(&mut self) {
        (**self).on_cue_fire()
    }

    fn on_period_transition(&mut self, from: PeriodKind, to: PeriodKind) {
        (**self).on_period_transition(from, to)
    }

    fn on_run_complete(&mut self, reason: CompletionReason) {
        (**self).on_run_complete(reason)
    }

    fn on_diagnostic(&mut self, message: &str) {
        (**self).on_diagnostic(message)
    }
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl SessionObserver for NullObserver {}
