//! Cue playback.
//!
//! Playback is fire-and-forget: a [`CuePlayer`] only reports whether it could
//! start a clip. [`PlaybackObserver`] wires a player into a session and makes
//! sure a refused clip is logged and reported but never ends the run.

use tracing::warn;

use super::deck::CueDeck;
use super::END_OF_PERIOD_SOUND;
use crate::error::PlaybackError;
use crate::session::{CompletionReason, SessionObserver};
use crate::timer::{DisplayUpdate, PeriodKind};

/// Starts playing a clip without waiting for it to finish.
pub trait CuePlayer: Send {
    fn play(&mut self, clip: &str) -> Result<(), PlaybackError>;
}

impl<T: CuePlayer + ?Sized> CuePlayer for Box<T> {
    fn play(&mut self, clip: &str) -> Result<(), PlaybackError> {
        (**self).play(clip)
    }
}

/// Plays cues and end-of-period sounds for a session, then forwards every
/// notification to `inner`.
pub struct PlaybackObserver<O, P> {
    inner: O,
    deck: CueDeck,
    player: P,
    end_of_period_sound: String,
}

impl<O: SessionObserver, P: CuePlayer> PlaybackObserver<O, P> {
    pub fn new(inner: O, deck: CueDeck, player: P) -> Self {
        Self {
            inner,
            deck,
            player,
            end_of_period_sound: END_OF_PERIOD_SOUND.to_string(),
        }
    }

    pub fn with_end_of_period_sound(mut self, clip: impl Into<String>) -> Self {
        self.end_of_period_sound = clip.into();
        self
    }

    pub fn inner(&self) -> &O {
        &self.inner
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    fn play(&mut self, clip: &str) {
        if let Err(e) = self.player.play(clip) {
            warn!(clip = %e.clip, error = %e.message, "audio playback failed");
            self.inner.on_diagnostic(&e.to_string());
        }
    }

    fn play_end_of_period(&mut self) {
        let clip = self.end_of_period_sound.clone();
        self.play(&clip);
    }
}

impl<O: SessionObserver, P: CuePlayer> SessionObserver for PlaybackObserver<O, P> {
    fn on_display_update(&mut self, update: &DisplayUpdate) {
        self.inner.on_display_update(update);
    }

    fn on_cue_fire(&mut self) {
        match self.deck.pick().map(str::to_owned) {
            Some(clip) => self.play(&clip),
            None => {
                warn!("no audio cues available to play");
                self.inner.on_diagnostic("no audio cues available to play");
            }
        }
        self.inner.on_cue_fire();
    }

    fn on_period_transition(&mut self, from: PeriodKind, to: PeriodKind) {
        self.play_end_of_period();
        self.inner.on_period_transition(from, to);
    }

    fn on_run_complete(&mut self, reason: CompletionReason) {
        if reason == CompletionReason::AllSessionsDone {
            self.play_end_of_period();
        }
        self.inner.on_run_complete(reason);
    }

    fn on_diagnostic(&mut self, message: &str) {
        self.inner.on_diagnostic(message);
    }
}
