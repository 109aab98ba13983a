//! Session controller.
//!
//! Drives one run in real time. Elapsed time is always recomputed as
//! `now - origin`, never accumulated tick by tick, so a missed or late tick
//! only delays the display; it never makes the countdown drift.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> (Paused <-> Running) -> (Completed | Stopped)
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::config::SessionConfig;
use super::observer::SessionObserver;
use crate::clock::Clock;
use crate::error::{StateError, ValidationError};
use crate::timer::{evaluate, CycleOutcome, CyclePlan, CycleState, DisplayUpdate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControllerState {
    Idle,
    Running,
    Paused,
    Completed,
    Stopped,
}

impl ControllerState {
    pub fn is_terminal(self) -> bool {
        matches!(self, ControllerState::Completed | ControllerState::Stopped)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionReason {
    AllSessionsDone,
    ManuallyStopped,
}

impl CompletionReason {
    pub fn message(self) -> &'static str {
        match self {
            CompletionReason::AllSessionsDone => "All Pomodoro Sessions Complete! Great work!",
            CompletionReason::ManuallyStopped => "Session manually ended.",
        }
    }
}

pub struct SessionController {
    config: SessionConfig,
    plan: CyclePlan,
    clock: Arc<dyn Clock>,
    state: ControllerState,
    /// Discarded once the run ends.
    cycle: Option<CycleState>,
    /// Timestamp the current period's elapsed time is measured from.
    origin_ms: u64,
    /// Elapsed seconds already handed to the cue scheduler.
    last_elapsed_secs: u64,
    /// Elapsed milliseconds frozen at pause.
    paused_elapsed_ms: Option<u64>,
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("cycle", &self.cycle)
            .field("origin_ms", &self.origin_ms)
            .field("last_elapsed_secs", &self.last_elapsed_secs)
            .finish()
    }
}

impl SessionController {
    /// Validate `config` and build an idle controller.
    pub fn new(config: SessionConfig, clock: Arc<dyn Clock>) -> Result<Self, ValidationError> {
        config.validate()?;
        let plan = config.plan();
        Ok(Self {
            config,
            plan,
            clock,
            state: ControllerState::Idle,
            cycle: None,
            origin_ms: 0,
            last_elapsed_secs: 0,
            paused_elapsed_ms: None,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn cycle(&self) -> Option<&CycleState> {
        self.cycle.as_ref()
    }

    /// Whole seconds elapsed in the current period, as of now.
    pub fn elapsed_secs(&self) -> u64 {
        match self.state {
            ControllerState::Running => self.raw_elapsed_ms() / 1000,
            ControllerState::Paused => self.paused_elapsed_ms.unwrap_or(0) / 1000,
            _ => 0,
        }
    }

    pub fn display(&self) -> Option<DisplayUpdate> {
        self.cycle
            .as_ref()
            .map(|c| DisplayUpdate::from_state(c, self.plan.total_focus_periods))
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self, observer: &mut dyn SessionObserver) -> Result<(), StateError> {
        if self.state != ControllerState::Idle {
            return Err(self.reject("start"));
        }
        let cycle = CycleState::first(&self.plan);
        self.cycle = Some(cycle);
        self.origin_ms = self.clock.now_ms();
        self.last_elapsed_secs = 0;
        self.state = ControllerState::Running;
        info!(
            focus_minutes = self.config.focus_minutes,
            periods = self.config.total_focus_periods,
            source = self.config.audio_source.label(),
            "session started"
        );
        observer.on_display_update(&DisplayUpdate::from_state(
            &cycle,
            self.plan.total_focus_periods,
        ));
        Ok(())
    }

    /// Freeze the origin. Ticks while paused do nothing.
    pub fn pause(&mut self) -> Result<(), StateError> {
        if self.state != ControllerState::Running {
            return Err(self.reject("pause"));
        }
        self.paused_elapsed_ms = Some(self.raw_elapsed_ms());
        self.state = ControllerState::Paused;
        debug!(elapsed_secs = self.elapsed_secs(), "session paused");
        Ok(())
    }

    /// Re-anchor the origin so the pause does not count as elapsed time.
    pub fn resume(&mut self) -> Result<(), StateError> {
        if self.state != ControllerState::Paused {
            return Err(self.reject("resume"));
        }
        let frozen = self.paused_elapsed_ms.take().unwrap_or(0);
        self.origin_ms = self.clock.now_ms().saturating_sub(frozen);
        self.state = ControllerState::Running;
        debug!(elapsed_secs = frozen / 1000, "session resumed");
        Ok(())
    }

    pub fn toggle_pause(&mut self) -> Result<ControllerState, StateError> {
        match self.state {
            ControllerState::Running => self.pause()?,
            ControllerState::Paused => self.resume()?,
            _ => return Err(self.reject("pause")),
        }
        Ok(self.state)
    }

    /// End the run early. Valid while running or paused.
    pub fn stop(
        &mut self,
        reason: CompletionReason,
        observer: &mut dyn SessionObserver,
    ) -> Result<(), StateError> {
        if !matches!(self.state, ControllerState::Running | ControllerState::Paused) {
            return Err(self.reject("stop"));
        }
        self.finish(ControllerState::Stopped, reason, observer);
        Ok(())
    }

    /// Process one tick. Returns the state after the tick.
    pub fn tick(&mut self, observer: &mut dyn SessionObserver) -> ControllerState {
        if self.state != ControllerState::Running {
            return self.state;
        }
        let Some(mut cycle) = self.cycle else {
            return self.state;
        };
        let now = self.clock.now_ms();

        loop {
            let elapsed = now.saturating_sub(self.origin_ms) / 1000;

            if elapsed > self.last_elapsed_secs {
                // A cue landing exactly on the end of the period is covered by
                // the end-of-period sound.
                let horizon = match cycle.duration().secs() {
                    Some(secs) => elapsed.min(secs.saturating_sub(1)),
                    None => elapsed,
                };
                let delta = horizon.saturating_sub(self.last_elapsed_secs);
                if let Some(cue) = cycle.cue_mut() {
                    let advance = cue.advance(delta);
                    if advance.fired > 1 {
                        debug!(fired = advance.fired, "catching up on missed cues");
                    }
                    for _ in 0..advance.fired {
                        observer.on_cue_fire();
                    }
                }
                self.last_elapsed_secs = elapsed;
            }

            match evaluate(&cycle, &self.plan, elapsed) {
                CycleOutcome::Running(next) => {
                    cycle = next;
                    break;
                }
                CycleOutcome::Advanced(next) => {
                    debug!(
                        from = cycle.kind().label(),
                        to = next.kind().label(),
                        index = next.index(),
                        "period transition"
                    );
                    observer.on_period_transition(cycle.kind(), next.kind());
                    // Time past the end of the finished period belongs to the next one.
                    let finished_ms = cycle
                        .duration()
                        .secs()
                        .unwrap_or(0)
                        .saturating_mul(1000);
                    self.origin_ms = self.origin_ms.saturating_add(finished_ms);
                    self.last_elapsed_secs = 0;
                    cycle = next;
                }
                CycleOutcome::RunComplete => {
                    self.finish(
                        ControllerState::Completed,
                        CompletionReason::AllSessionsDone,
                        observer,
                    );
                    return self.state;
                }
            }
        }

        self.cycle = Some(cycle);
        observer.on_display_update(&DisplayUpdate::from_state(
            &cycle,
            self.plan.total_focus_periods,
        ));
        self.state
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn raw_elapsed_ms(&self) -> u64 {
        self.clock.now_ms().saturating_sub(self.origin_ms)
    }

    fn reject(&self, command: &'static str) -> StateError {
        StateError::InvalidCommand {
            command,
            state: self.state,
        }
    }

    fn finish(
        &mut self,
        state: ControllerState,
        reason: CompletionReason,
        observer: &mut dyn SessionObserver,
    ) {
        self.state = state;
        self.cycle = None;
        self.paused_elapsed_ms = None;
        info!(?reason, "session ended");
        observer.on_run_complete(reason);
    }
}
