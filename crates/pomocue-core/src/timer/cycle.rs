//! Focus/break cycle state machine.
//!
//! ## Transitions
//!
//! ```text
//! Focus(n) --elapsed >= duration, n <  total--> Break(n)
//! Focus(n) --elapsed >= duration, n == total--> run complete
//! Break(n) --elapsed >= duration-------------> Focus(n + 1)
//! ```
//!
//! Indefinite focus periods never reach their duration. Evaluation is pure:
//! [`evaluate`] returns a new state and never mutates the one it was given.

use serde::{Deserialize, Serialize};

use super::cue::CueScheduler;
use super::display::Remaining;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodKind {
    Focus,
    Break,
}

impl PeriodKind {
    pub fn label(self) -> &'static str {
        match self {
            PeriodKind::Focus => "FOCUS",
            PeriodKind::Break => "BREAK",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodDuration {
    Timed { secs: u64 },
    Indefinite,
}

impl PeriodDuration {
    /// `0` minutes means indefinite.
    pub fn from_minutes(minutes: u32) -> Self {
        if minutes == 0 {
            PeriodDuration::Indefinite
        } else {
            PeriodDuration::Timed {
                secs: u64::from(minutes).saturating_mul(60),
            }
        }
    }

    pub fn secs(self) -> Option<u64> {
        match self {
            PeriodDuration::Timed { secs } => Some(secs),
            PeriodDuration::Indefinite => None,
        }
    }

    pub fn is_indefinite(self) -> bool {
        matches!(self, PeriodDuration::Indefinite)
    }
}

/// Durations and counts the cycle runs on, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CyclePlan {
    pub focus: PeriodDuration,
    pub break_secs: u64,
    pub cue_interval_secs: u64,
    pub total_focus_periods: u32,
}

/// Where the run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleState {
    kind: PeriodKind,
    index: u32,
    duration: PeriodDuration,
    elapsed_secs: u64,
    /// Present only during focus periods.
    cue: Option<CueScheduler>,
}

impl CycleState {
    /// First focus period of a run.
    pub fn first(plan: &CyclePlan) -> Self {
        Self::focus(plan, 1)
    }

    fn focus(plan: &CyclePlan, index: u32) -> Self {
        Self {
            kind: PeriodKind::Focus,
            index,
            duration: plan.focus,
            elapsed_secs: 0,
            cue: Some(CueScheduler::new(plan.cue_interval_secs)),
        }
    }

    fn rest(plan: &CyclePlan, index: u32) -> Self {
        Self {
            kind: PeriodKind::Break,
            index,
            duration: PeriodDuration::Timed {
                secs: plan.break_secs.max(1),
            },
            elapsed_secs: 0,
            cue: None,
        }
    }

    pub fn kind(&self) -> PeriodKind {
        self.kind
    }

    /// 1-based focus period number; a break shares the number of the focus before it.
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn duration(&self) -> PeriodDuration {
        self.duration
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn cue(&self) -> Option<&CueScheduler> {
        self.cue.as_ref()
    }

    pub fn cue_mut(&mut self) -> Option<&mut CueScheduler> {
        self.cue.as_mut()
    }

    pub fn remaining(&self) -> Remaining {
        match self.duration {
            PeriodDuration::Timed { secs } => Remaining::Secs(secs.saturating_sub(self.elapsed_secs)),
            PeriodDuration::Indefinite => Remaining::Indefinite,
        }
    }

    /// Whether `elapsed_secs` reaches the end of this period.
    pub fn is_due(&self, elapsed_secs: u64) -> bool {
        matches!(self.duration, PeriodDuration::Timed { secs } if elapsed_secs >= secs)
    }
}

/// Outcome of evaluating a [`CycleState`] against elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The period continues; carries the state with elapsed time applied.
    Running(CycleState),
    /// The period ended and the next one begins.
    Advanced(CycleState),
    /// The final focus period ended.
    RunComplete,
}

/// Apply `elapsed_secs` (time since the current period began) to `state`.
pub fn evaluate(state: &CycleState, plan: &CyclePlan, elapsed_secs: u64) -> CycleOutcome {
    if !state.is_due(elapsed_secs) {
        let mut current = *state;
        current.elapsed_secs = elapsed_secs;
        return CycleOutcome::Running(current);
    }

    match state.kind {
        PeriodKind::Focus if state.index < plan.total_focus_periods => {
            CycleOutcome::Advanced(CycleState::rest(plan, state.index))
        }
        PeriodKind::Focus => CycleOutcome::RunComplete,
        PeriodKind::Break => CycleOutcome::Advanced(CycleState::focus(plan, state.index + 1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(total: u32) -> CyclePlan {
        CyclePlan {
            focus: PeriodDuration::from_minutes(10),
            break_secs: 60,
            cue_interval_secs: 60,
            total_focus_periods: total,
        }
    }

    fn expect_advanced(outcome: CycleOutcome) -> CycleState {
        match outcome {
            CycleOutcome::Advanced(next) => next,
            other => panic!("expected Advanced, got {other:?}"),
        }
    }

    #[test]
    fn first_period_is_focus_one_with_full_cue() {
        let state = CycleState::first(&plan(3));
        assert_eq!(state.kind(), PeriodKind::Focus);
        assert_eq!(state.index(), 1);
        assert_eq!(state.cue().map(|c| c.secs_until_next()), Some(60));
        assert_eq!(state.remaining(), Remaining::Secs(600));
    }

    #[test]
    fn deserialized_state_checks_its_cue() {
        let state = CycleState::first(&plan(1));
        let mut json = serde_json::to_value(state).unwrap();
        assert_eq!(serde_json::from_value::<CycleState>(json.clone()).unwrap(), state);

        json["cue"]["interval_secs"] = serde_json::json!(0);
        assert!(serde_json::from_value::<CycleState>(json).is_err());
    }

    #[test]
    fn running_applies_elapsed_without_mutating_input() {
        let p = plan(2);
        let state = CycleState::first(&p);
        match evaluate(&state, &p, 125) {
            CycleOutcome::Running(next) => {
                assert_eq!(next.elapsed_secs(), 125);
                assert_eq!(next.remaining(), Remaining::Secs(475));
            }
            other => panic!("expected Running, got {other:?}"),
        }
        assert_eq!(state.elapsed_secs(), 0);
    }

    #[test]
    fn focus_before_last_moves_to_break_with_same_index() {
        let p = plan(2);
        let next = expect_advanced(evaluate(&CycleState::first(&p), &p, 600));
        assert_eq!(next.kind(), PeriodKind::Break);
        assert_eq!(next.index(), 1);
        assert_eq!(next.duration(), PeriodDuration::Timed { secs: 60 });
        assert!(next.cue().is_none());
    }

    #[test]
    fn break_moves_to_next_focus_with_reset_cue() {
        let p = plan(3);
        let rest = expect_advanced(evaluate(&CycleState::first(&p), &p, 600));
        let focus = expect_advanced(evaluate(&rest, &p, 60));
        assert_eq!(focus.kind(), PeriodKind::Focus);
        assert_eq!(focus.index(), 2);
        assert_eq!(focus.cue().map(|c| c.secs_until_next()), Some(60));
    }

    #[test]
    fn last_focus_completes_the_run() {
        let p = plan(1);
        assert_eq!(
            evaluate(&CycleState::first(&p), &p, 600),
            CycleOutcome::RunComplete
        );
    }

    #[test]
    fn index_only_grows_after_breaks() {
        let p = plan(3);
        let mut state = CycleState::first(&p);
        let mut seen = vec![(state.kind(), state.index())];
        loop {
            let due = state.duration().secs().unwrap();
            match evaluate(&state, &p, due) {
                CycleOutcome::Advanced(next) => {
                    state = next;
                    seen.push((state.kind(), state.index()));
                }
                CycleOutcome::RunComplete => break,
                CycleOutcome::Running(_) => unreachable!(),
            }
        }
        assert_eq!(
            seen,
            vec![
                (PeriodKind::Focus, 1),
                (PeriodKind::Break, 1),
                (PeriodKind::Focus, 2),
                (PeriodKind::Break, 2),
                (PeriodKind::Focus, 3),
            ]
        );
    }

    #[test]
    fn indefinite_focus_never_completes() {
        let p = CyclePlan {
            focus: PeriodDuration::from_minutes(0),
            ..plan(1)
        };
        let state = CycleState::first(&p);
        assert!(matches!(
            evaluate(&state, &p, u64::MAX / 2),
            CycleOutcome::Running(_)
        ));
        assert_eq!(state.remaining(), Remaining::Indefinite);
    }

    #[test]
    fn break_duration_is_never_zero() {
        let p = CyclePlan {
            break_secs: 0,
            ..plan(2)
        };
        let rest = expect_advanced(evaluate(&CycleState::first(&p), &p, 600));
        assert_eq!(rest.duration(), PeriodDuration::Timed { secs: 1 });
    }
}
