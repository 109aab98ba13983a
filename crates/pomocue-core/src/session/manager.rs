//! Handle-based command surface over live sessions.
//!
//! Each session sits behind its own mutex. Ticks take it with `try_lock` and
//! skip when a command holds it, so a tick never starts while another tick or
//! a command is still mutating the same session. Locks are always taken in
//! the order registry -> session and the registry lock is released before a
//! session lock is taken.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, TryLockError, Weak};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use super::config::SessionConfig;
use super::controller::{CompletionReason, ControllerState, SessionController};
use super::observer::SessionObserver;
use crate::clock::Clock;
use crate::error::{StateError, ValidationError};
use crate::ticker::{CancelToken, TickControl, TickScheduler, TickTask};
use crate::timer::DisplayUpdate;

/// Default tick cadence.
pub const TICK_INTERVAL_MS: u64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionHandle(Uuid);

impl SessionHandle {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

struct LiveSession {
    controller: SessionController,
    observer: Box<dyn SessionObserver>,
}

struct Entry {
    session: Arc<Mutex<LiveSession>>,
    token: CancelToken,
}

type Registry = Mutex<HashMap<SessionHandle, Entry>>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct SessionManager<S: TickScheduler> {
    scheduler: S,
    clock: Arc<dyn Clock>,
    tick_interval_ms: u64,
    registry: Arc<Registry>,
}

impl<S: TickScheduler> SessionManager<S> {
    pub fn new(scheduler: S, clock: Arc<dyn Clock>) -> Self {
        Self {
            scheduler,
            clock,
            tick_interval_ms: TICK_INTERVAL_MS,
            registry: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn with_tick_interval_ms(mut self, interval_ms: u64) -> Self {
        self.tick_interval_ms = interval_ms.max(1);
        self
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Validate `config`, start the run and register its tick.
    ///
    /// An invalid config creates no state and schedules nothing.
    pub fn start_session<O>(
        &self,
        config: SessionConfig,
        observer: O,
    ) -> Result<SessionHandle, ValidationError>
    where
        O: SessionObserver + 'static,
    {
        let mut controller = SessionController::new(config, Arc::clone(&self.clock))?;
        let mut observer: Box<dyn SessionObserver> = Box::new(observer);
        if let Err(e) = controller.start(observer.as_mut()) {
            observer.on_diagnostic(&e.to_string());
        }

        let handle = SessionHandle::new();
        let session = Arc::new(Mutex::new(LiveSession {
            controller,
            observer,
        }));

        // Held across scheduling so a tick cannot unregister before we register.
        let mut registry = lock(&self.registry);
        let task = tick_task(handle, Arc::downgrade(&session), Arc::downgrade(&self.registry));
        let token = self.scheduler.schedule(self.tick_interval_ms, task);
        registry.insert(handle, Entry { session, token });
        debug!(%handle, "session registered");
        Ok(handle)
    }

    pub fn pause(&self, handle: SessionHandle) -> Result<(), StateError> {
        self.with_session(handle, |live| live.controller.pause())
    }

    pub fn resume(&self, handle: SessionHandle) -> Result<(), StateError> {
        self.with_session(handle, |live| live.controller.resume())
    }

    pub fn toggle_pause(&self, handle: SessionHandle) -> Result<ControllerState, StateError> {
        self.with_session(handle, |live| live.controller.toggle_pause())
    }

    /// End the run, cancel its tick and discard its state.
    pub fn stop(&self, handle: SessionHandle, reason: CompletionReason) -> Result<(), StateError> {
        self.with_session(handle, |live| {
            let LiveSession {
                controller,
                observer,
            } = live;
            controller.stop(reason, observer.as_mut())
        })?;
        self.unregister(handle);
        Ok(())
    }

    /// Drop a session without notifying its observer, as when the front end
    /// navigates away from the session view.
    pub fn discard(&self, handle: SessionHandle) -> Result<(), StateError> {
        match self.unregister(handle) {
            true => Ok(()),
            false => Err(StateError::UnknownSession(handle)),
        }
    }

    /// Stop every live session.
    pub fn stop_all(&self) {
        let handles: Vec<SessionHandle> = lock(&self.registry).keys().copied().collect();
        for handle in handles {
            if let Err(e) = self.stop(handle, CompletionReason::ManuallyStopped) {
                warn!(%handle, error = %e, "could not stop session");
            }
        }
    }

    pub fn state(&self, handle: SessionHandle) -> Option<ControllerState> {
        let session = self.session(handle)?;
        let state = lock(&session).controller.state();
        Some(state)
    }

    pub fn display(&self, handle: SessionHandle) -> Option<DisplayUpdate> {
        let session = self.session(handle)?;
        let display = lock(&session).controller.display();
        display
    }

    pub fn active_sessions(&self) -> usize {
        lock(&self.registry).len()
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn session(&self, handle: SessionHandle) -> Option<Arc<Mutex<LiveSession>>> {
        lock(&self.registry)
            .get(&handle)
            .map(|entry| Arc::clone(&entry.session))
    }

    fn with_session<T>(
        &self,
        handle: SessionHandle,
        f: impl FnOnce(&mut LiveSession) -> Result<T, StateError>,
    ) -> Result<T, StateError> {
        let session = self
            .session(handle)
            .ok_or(StateError::UnknownSession(handle))?;
        let mut live = lock(&session);
        let result = f(&mut *live);
        if let Err(e) = &result {
            warn!(%handle, error = %e, "command rejected");
        }
        result
    }

    fn unregister(&self, handle: SessionHandle) -> bool {
        match lock(&self.registry).remove(&handle) {
            Some(entry) => {
                entry.token.cancel();
                debug!(%handle, "session unregistered");
                true
            }
            None => false,
        }
    }
}

fn tick_task(
    handle: SessionHandle,
    session: Weak<Mutex<LiveSession>>,
    registry: Weak<Registry>,
) -> TickTask {
    Box::new(move || {
        let Some(session) = session.upgrade() else {
            return TickControl::Stop;
        };
        let finished = {
            let mut live = match session.try_lock() {
                Ok(guard) => guard,
                Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
                Err(TryLockError::WouldBlock) => {
                    debug!(%handle, "tick skipped: session busy");
                    return TickControl::Continue;
                }
            };
            let LiveSession {
                controller,
                observer,
            } = &mut *live;
            controller.tick(observer.as_mut()).is_terminal()
        };
        if !finished {
            return TickControl::Continue;
        }
        if let Some(registry) = registry.upgrade() {
            lock(&registry).remove(&handle);
        }
        TickControl::Stop
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::events::EventLog;
    use crate::ticker::ManualScheduler;

    fn manager() -> (SessionManager<ManualScheduler>, ManualClock) {
        let clock = ManualClock::new(0);
        let mgr = SessionManager::new(ManualScheduler::new(), Arc::new(clock.clone()));
        (mgr, clock)
    }

    #[test]
    fn invalid_config_registers_nothing() {
        let (mgr, _clock) = manager();
        let log = EventLog::new();
        let config = SessionConfig {
            break_minutes: 0,
            ..SessionConfig::default()
        };
        assert_eq!(
            mgr.start_session(config, log.clone()).unwrap_err(),
            ValidationError::BreakTooShort(0)
        );
        assert_eq!(mgr.active_sessions(), 0);
        assert_eq!(mgr.scheduler().live_tasks(), 0);
        assert!(log.is_empty());
    }

    #[test]
    fn commands_on_unknown_handle_are_state_errors() {
        let (mgr, _clock) = manager();
        let (other, _) = manager();
        let handle = other
            .start_session(SessionConfig::default(), EventLog::new())
            .unwrap();
        assert_eq!(mgr.pause(handle), Err(StateError::UnknownSession(handle)));
        assert_eq!(mgr.resume(handle), Err(StateError::UnknownSession(handle)));
        assert_eq!(
            mgr.stop(handle, CompletionReason::ManuallyStopped),
            Err(StateError::UnknownSession(handle))
        );
    }

    #[test]
    fn stop_cancels_tick_and_forgets_session() {
        let (mgr, _clock) = manager();
        let log = EventLog::new();
        let handle = mgr
            .start_session(SessionConfig::default(), log.clone())
            .unwrap();
        assert_eq!(mgr.scheduler().live_tasks(), 1);

        mgr.stop(handle, CompletionReason::ManuallyStopped).unwrap();
        assert_eq!(mgr.scheduler().live_tasks(), 0);
        assert_eq!(mgr.state(handle), None);
        assert_eq!(mgr.pause(handle), Err(StateError::UnknownSession(handle)));
        assert_eq!(log.completions(), vec![CompletionReason::ManuallyStopped]);
    }

    #[test]
    fn ticks_skip_while_a_command_holds_the_session() {
        let (mgr, clock) = manager();
        let log = EventLog::new();
        let handle = mgr
            .start_session(SessionConfig::default(), log.clone())
            .unwrap();
        let session = mgr.session(handle).unwrap();

        let guard = lock(&session);
        clock.advance_secs(5);
        assert_eq!(mgr.scheduler().run_pending(), 1);
        drop(guard);
        assert_eq!(log.display_updates().len(), 1);

        mgr.scheduler().run_pending();
        assert_eq!(log.display_updates().len(), 2);
    }

    #[test]
    fn discard_drops_without_notification() {
        let (mgr, _clock) = manager();
        let log = EventLog::new();
        let handle = mgr
            .start_session(SessionConfig::default(), log.clone())
            .unwrap();
        mgr.discard(handle).unwrap();
        assert!(log.completions().is_empty());
        assert_eq!(mgr.discard(handle), Err(StateError::UnknownSession(handle)));
        assert_eq!(mgr.scheduler().live_tasks(), 0);
    }

    #[test]
    fn stop_all_ends_every_session() {
        let (mgr, _clock) = manager();
        let a = EventLog::new();
        let b = EventLog::new();
        mgr.start_session(SessionConfig::default(), a.clone()).unwrap();
        mgr.start_session(SessionConfig::default(), b.clone()).unwrap();
        mgr.stop_all();
        assert_eq!(mgr.active_sessions(), 0);
        assert_eq!(a.completions().len(), 1);
        assert_eq!(b.completions().len(), 1);
    }
}
