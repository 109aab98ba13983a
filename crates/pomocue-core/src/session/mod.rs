//! Running sessions: configuration, the real-time controller, the
//! handle-based manager and the observer interface front ends implement.

mod config;
mod controller;
mod manager;
mod observer;

pub use config::{AudioSource, SessionConfig, MIN_TIMED_FOCUS_MINUTES};
pub use controller::{CompletionReason, ControllerState, SessionController};
pub use manager::{SessionHandle, SessionManager, TICK_INTERVAL_MS};
pub use observer::{NullObserver, SessionObserver};
