//! Audio cue sources, selection and playback.

mod deck;
mod library;
mod player;

pub use deck::CueDeck;
pub use library::{cue_file_name, CueLibrary, UploadReport};
pub use player::{CuePlayer, PlaybackObserver};

/// Upper bound on the uploaded cue set.
pub const MAX_UPLOADED_CUES: usize = 10;

/// Delay between a cue firing and its clip starting, to let the front end settle.
pub const CUE_START_DELAY_MS: u64 = 1000;

/// Played whenever a period ends.
pub const END_OF_PERIOD_SOUND: &str = "default/beep.mp3";

/// Built-in cues used by the default audio source.
pub const DEFAULT_CUES: [&str; 9] = [
    "default/download (1).wav",
    "default/download (2).wav",
    "default/download (3).wav",
    "default/download (4).wav",
    "default/download (5).wav",
    "default/download (6).wav",
    "default/download (7).wav",
    "default/download (8).wav",
    "default/download.wav",
];
