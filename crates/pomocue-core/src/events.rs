use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::{CompletionReason, SessionObserver};
use crate::timer::{DisplayUpdate, PeriodKind};

/// Every notification a session produces, as a timestamped record.
/// The CLI prints these as JSON lines; tests assert on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    DisplayUpdated {
        #[serde(flatten)]
        update: DisplayUpdate,
        at: DateTime<Utc>,
    },
    CueFired {
        at: DateTime<Utc>,
    },
    PeriodTransition {
        from: PeriodKind,
        to: PeriodKind,
        at: DateTime<Utc>,
    },
    RunCompleted {
        reason: CompletionReason,
        at: DateTime<Utc>,
    },
    Diagnostic {
        message: String,
        at: DateTime<Utc>,
    },
}

/// Observer that records every notification as an [`Event`].
///
/// Clones share one log, so a caller can hand a clone to a session and keep
/// reading from the original.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<Event>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> MutexGuard<'_, Vec<Event>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn push(&self, event: Event) {
        self.guard().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.guard().clone()
    }

    /// Remove and return everything recorded so far.
    pub fn drain(&self) -> Vec<Event> {
        std::mem::take(&mut *self.guard())
    }

    pub fn len(&self) -> usize {
        self.guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard().is_empty()
    }

    pub fn cue_count(&self) -> usize {
        self.guard()
            .iter()
            .filter(|e| matches!(e, Event::CueFired { .. }))
            .count()
    }

    pub fn display_updates(&self) -> Vec<DisplayUpdate> {
        self.guard()
            .iter()
            .filter_map(|e| match e {
                Event::DisplayUpdated { update, .. } => Some(*update),
                _ => None,
            })
            .collect()
    }

    pub fn completions(&self) -> Vec<CompletionReason> {
        self.guard()
            .iter()
            .filter_map(|e| match e {
                Event::RunCompleted { reason, .. } => Some(*reason),
                _ => None,
            })
            .collect()
    }

    pub fn transitions(&self) -> Vec<(PeriodKind, PeriodKind)> {
        self.guard()
            .iter()
            .filter_map(|e| match e {
                Event::PeriodTransition { from, to, .. } => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }
}

impl SessionObserver for EventLog {
    fn on_display_update(&mut self, update: &DisplayUpdate) {
        self.push(Event::DisplayUpdated {
            update: *update,
            at: Utc::now(),
        });
    }

    fn on_cue_fire(&mut self) {
        self.push(Event::CueFired { at: Utc::now() });
    }

    fn on_period_transition(&mut self, from: PeriodKind, to: PeriodKind) {
        self.push(Event::PeriodTransition {
            from,
            to,
            at: Utc::now(),
        });
    }

    fn on_run_complete(&mut self, reason: CompletionReason) {
        self.push(Event::RunCompleted {
            reason,
            at: Utc::now(),
        });
    }

    fn on_diagnostic(&mut self, message: &str) {
        self.push(Event::Diagnostic {
            message: message.to_string(),
            at: Utc::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_log() {
        let log = EventLog::new();
        let mut handed_out = log.clone();
        handed_out.on_cue_fire();
        handed_out.on_run_complete(CompletionReason::ManuallyStopped);
        assert_eq!(log.len(), 2);
        assert_eq!(log.cue_count(), 1);
        assert_eq!(log.completions(), vec![CompletionReason::ManuallyStopped]);
    }

    #[test]
    fn drain_empties_the_log() {
        let mut log = EventLog::new();
        log.on_diagnostic("no audio device");
        assert_eq!(log.drain().len(), 1);
        assert!(log.is_empty());
    }

    #[test]
    fn events_serialize_with_type_tag() {
        let event = Event::PeriodTransition {
            from: PeriodKind::Focus,
            to: PeriodKind::Break,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "period_transition");
        assert_eq!(json["from"], "focus");
        assert_eq!(json["to"], "break");
    }
}
