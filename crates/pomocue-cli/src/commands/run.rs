use std::sync::Arc;

use clap::Args;
use pomocue_core::session::AudioSource;
use pomocue_core::{
    CompletionReason, Config, CueDeck, CueLibrary, PlaybackObserver, SessionHandle,
    SessionManager, SessionObserver, SystemClock, TickScheduler, TokioScheduler,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::terminal::{TerminalPlayer, TerminalView};

#[derive(Args)]
pub struct RunArgs {
    /// Focus minutes (0 = no time limit)
    #[arg(long)]
    focus: Option<u32>,
    /// Minutes between cues
    #[arg(long)]
    interval: Option<u32>,
    /// Number of focus periods
    #[arg(long)]
    sessions: Option<u32>,
    /// Break minutes
    #[arg(long = "break")]
    break_minutes: Option<u32>,
    /// Custom cue file (repeatable, at most 10)
    #[arg(long = "cue")]
    cues: Vec<String>,
    /// Print events as JSON lines
    #[arg(long)]
    json: bool,
    /// Seed for cue selection
    #[arg(long)]
    seed: Option<u64>,
    /// Run silently
    #[arg(long)]
    no_audio: bool,
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let stored = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, "using default settings");
            eprintln!("warning: {e}; using default settings");
            Config::default()
        }
    };

    let audio_source = if args.cues.is_empty() {
        AudioSource::Default
    } else {
        let mut library = CueLibrary::new();
        let report = library.add_batch(args.cues.iter().cloned());
        super::warn_upload(&report);
        AudioSource::from_library(&library)
    };

    let mut config = stored.session_config(audio_source);
    if let Some(focus) = args.focus {
        config.focus_minutes = focus;
    }
    if let Some(interval) = args.interval {
        config.cue_interval_minutes = interval;
    }
    if let Some(sessions) = args.sessions {
        config.total_focus_periods = sessions;
    }
    if let Some(break_minutes) = args.break_minutes {
        config.break_minutes = break_minutes;
    }
    config.validate()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let result = runtime.block_on(async {
        let (done_tx, mut done_rx) = mpsc::unbounded_channel();
        let view = TerminalView::new(args.json, done_tx);

        let observer: Box<dyn SessionObserver> = if args.no_audio || !stored.audio.enabled {
            Box::new(view)
        } else {
            let cues = config.audio_source.cues();
            let deck = match args.seed {
                Some(seed) => CueDeck::with_seed(cues, seed),
                None => CueDeck::new(cues),
            };
            let player = TerminalPlayer::new(
                tokio::runtime::Handle::current(),
                stored.audio.cue_start_delay_ms,
            );
            Box::new(
                PlaybackObserver::new(view, deck, player)
                    .with_end_of_period_sound(stored.audio.end_of_period_sound.clone()),
            )
        };

        let manager = SessionManager::new(TokioScheduler::current(), Arc::new(SystemClock::new()))
            .with_tick_interval_ms(stored.tick_interval_ms);
        let handle = manager.start_session(config, observer)?;
        tracing::info!(%handle, "session started");

        if !args.json {
            eprintln!("controls: p = pause/resume, s = stop");
        }

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdin_open = true;
        loop {
            tokio::select! {
                reason = done_rx.recv() => {
                    tracing::debug!(?reason, "run finished");
                    break;
                }
                line = lines.next_line(), if stdin_open => {
                    match line {
                        Ok(Some(cmd)) => {
                            if apply_command(&manager, handle, &cmd) == Flow::Exit {
                                break;
                            }
                        }
                        Ok(None) => stdin_open = false,
                        Err(e) => {
                            tracing::warn!(error = %e, "stdin closed");
                            stdin_open = false;
                        }
                    }
                }
            }
        }
        Ok::<(), Box<dyn std::error::Error>>(())
    });

    // A blocking stdin read would otherwise hold shutdown open.
    runtime.shutdown_background();
    result
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Apply one stdin command to the running session.
///
/// A stop that loses the race against the final tick finds the session
/// already gone; the run is over either way.
fn apply_command<S: TickScheduler>(
    manager: &SessionManager<S>,
    handle: SessionHandle,
    cmd: &str,
) -> Flow {
    match cmd.trim() {
        "p" | "pause" => {
            if let Err(e) = manager.toggle_pause(handle) {
                eprintln!("{e}");
            }
            Flow::Continue
        }
        "s" | "q" | "stop" => {
            if let Err(e) = manager.stop(handle, CompletionReason::ManuallyStopped) {
                eprintln!("{e}");
            }
            Flow::Exit
        }
        "" => Flow::Continue,
        other => {
            eprintln!("unknown command: {other}");
            Flow::Continue
        }
    }
}
