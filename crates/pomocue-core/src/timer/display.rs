//! Display-ready countdown values.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::cycle::{CycleState, PeriodKind};

/// Sentinel shown in place of a countdown for indefinite periods.
pub const INDEFINITE_CLOCK: &str = "--:--";

/// Time left in a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Remaining {
    Secs(u64),
    Indefinite,
}

impl fmt::Display for Remaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Remaining::Secs(secs) => f.write_str(&format_clock(*secs)),
            Remaining::Indefinite => f.write_str(INDEFINITE_CLOCK),
        }
    }
}

/// `MM:SS`, with minutes growing past two digits when needed.
pub fn format_clock(total_secs: u64) -> String {
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

/// Snapshot handed to the front end once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayUpdate {
    pub remaining_period: Remaining,
    /// `None` during breaks.
    pub remaining_cue_secs: Option<u64>,
    pub period_kind: PeriodKind,
    pub period_index: u32,
    pub total_periods: u32,
}

impl DisplayUpdate {
    pub fn from_state(state: &CycleState, total_periods: u32) -> Self {
        Self {
            remaining_period: state.remaining(),
            remaining_cue_secs: state.cue().map(|c| c.secs_until_next()),
            period_kind: state.kind(),
            period_index: state.index(),
            total_periods,
        }
    }

    pub fn period_clock(&self) -> String {
        self.remaining_period.to_string()
    }

    pub fn cue_clock(&self) -> Option<String> {
        self.remaining_cue_secs.map(format_clock)
    }

    /// Heading line, e.g. `FOCUS - Session 2 / 4` or `BREAK - Session REST`.
    pub fn title(&self) -> String {
        match self.period_kind {
            PeriodKind::Focus => format!(
                "{} - Session {} / {}",
                self.period_kind.label(),
                self.period_index,
                self.total_periods
            ),
            PeriodKind::Break => format!("{} - Session REST", self.period_kind.label()),
        }
    }
}
