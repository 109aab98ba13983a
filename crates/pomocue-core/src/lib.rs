//! # pomocue Core Library
//!
//! Session timekeeping for a focus timer that plays periodic audio cues
//! during focus periods and walks a fixed sequence of focus and break
//! periods. Front ends (the bundled CLI, or anything else implementing
//! [`SessionObserver`]) render what the core reports and forward user
//! commands back to it.
//!
//! ## Architecture
//!
//! - **Clock**: millisecond timestamps, only ever subtracted
//! - **Cue Scheduler**: counts due cues from elapsed seconds, catching up
//!   after missed ticks
//! - **Cycle State Machine**: pure focus/break/period-index transitions
//! - **Session Controller**: drift-corrected real-time driver, pause/resume/stop
//! - **Session Manager**: handle-based commands over sessions ticking on an
//!   injected [`TickScheduler`]
//!
//! ## Key Components
//!
//! - [`SessionManager`]: start/pause/resume/stop by handle
//! - [`SessionController`]: one run's state and tick logic
//! - [`CueScheduler`]: cue countdown with multi-fire catch-up
//! - [`Config`]: TOML defaults

pub mod audio;
pub mod clock;
pub mod error;
pub mod events;
pub mod session;
pub mod storage;
pub mod ticker;
pub mod timer;

pub use audio::{CueDeck, CueLibrary, CuePlayer, PlaybackObserver, UploadReport};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ConfigError, CoreError, PlaybackError, StateError, ValidationError};
pub use events::{Event, EventLog};
pub use session::{
    AudioSource, CompletionReason, ControllerState, SessionConfig, SessionController,
    SessionHandle, SessionManager, SessionObserver,
};
pub use storage::Config;
pub use ticker::{CancelToken, ManualScheduler, TickControl, TickScheduler, TokioScheduler};
pub use timer::{
    CueAdvance, CueScheduler, CycleOutcome, CyclePlan, CycleState, DisplayUpdate, PeriodDuration,
    PeriodKind, Remaining,
};
