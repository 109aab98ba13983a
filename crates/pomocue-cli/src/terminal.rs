//! Terminal front end for a running session.

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use chrono::Utc;
use pomocue_core::timer::{DisplayUpdate, PeriodKind};
use pomocue_core::{CompletionReason, CuePlayer, Event, PlaybackError, SessionObserver};
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;

/// Renders session notifications on stdout, either as a status line or as
/// JSON event lines, and reports the end of the run on `done`.
pub struct TerminalView {
    json: bool,
    done: UnboundedSender<CompletionReason>,
}

impl TerminalView {
    pub fn new(json: bool, done: UnboundedSender<CompletionReason>) -> Self {
        Self { json, done }
    }

    fn emit(&self, event: &Event) {
        match serde_json::to_string(event) {
            Ok(line) => println!("{line}"),
            Err(e) => tracing::warn!(error = %e, "could not encode event"),
        }
    }
}

impl SessionObserver for TerminalView {
    fn on_display_update(&mut self, update: &DisplayUpdate) {
        if self.json {
            self.emit(&Event::DisplayUpdated {
                update: *update,
                at: Utc::now(),
            });
            return;
        }
        let cue = update
            .cue_clock()
            .map(|c| format!("  next cue {c}"))
            .unwrap_or_default();
        print!("\r{}  {}{cue}   ", update.title(), update.period_clock());
        let _ = std::io::stdout().flush();
    }

    fn on_cue_fire(&mut self) {
        if self.json {
            self.emit(&Event::CueFired { at: Utc::now() });
        }
    }

    fn on_period_transition(&mut self, from: PeriodKind, to: PeriodKind) {
        if self.json {
            self.emit(&Event::PeriodTransition {
                from,
                to,
                at: Utc::now(),
            });
        } else {
            println!("\n{} over, {} starts", from.label(), to.label());
        }
    }

    fn on_run_complete(&mut self, reason: CompletionReason) {
        if self.json {
            self.emit(&Event::RunCompleted {
                reason,
                at: Utc::now(),
            });
        } else {
            println!("\n{}", reason.message());
        }
        let _ = self.done.send(reason);
    }

    fn on_diagnostic(&mut self, message: &str) {
        if self.json {
            self.emit(&Event::Diagnostic {
                message: message.to_string(),
                at: Utc::now(),
            });
        } else {
            eprintln!("\n{message}");
        }
    }
}

/// Announces clips on stderr with the terminal bell after the configured
/// start delay.
///
/// Built-in clips (`default/...`) always play; any other clip must exist on
/// disk.
pub struct TerminalPlayer {
    runtime: Handle,
    delay: Duration,
}

impl TerminalPlayer {
    pub fn new(runtime: Handle, delay_ms: u64) -> Self {
        Self {
            runtime,
            delay: Duration::from_millis(delay_ms),
        }
    }
}

impl CuePlayer for TerminalPlayer {
    fn play(&mut self, clip: &str) -> Result<(), PlaybackError> {
        if !clip.starts_with("default/") && !Path::new(clip).is_file() {
            return Err(PlaybackError::new(clip, "file not found"));
        }
        let clip = clip.to_string();
        let delay = self.delay;
        self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            eprint!("\x07");
            tracing::info!(%clip, "playing");
        });
        Ok(())
    }
}
