mod cue;
mod cycle;
mod display;

pub use cue::{CueAdvance, CueScheduler};
pub use cycle::{evaluate, CycleOutcome, CyclePlan, CycleState, PeriodDuration, PeriodKind};
pub use display::{format_clock, DisplayUpdate, Remaining, INDEFINITE_CLOCK};
