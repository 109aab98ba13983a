use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::audio::{cue_file_name, CueLibrary, DEFAULT_CUES, MAX_UPLOADED_CUES};
use crate::error::ValidationError;
use crate::timer::{CyclePlan, PeriodDuration};

/// Shortest focus period that is not indefinite.
pub const MIN_TIMED_FOCUS_MINUTES: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "cues", rename_all = "lowercase")]
pub enum AudioSource {
    /// The built-in [`DEFAULT_CUES`].
    Default,
    /// User-supplied cue files, in upload order.
    Uploaded(Vec<String>),
}

impl AudioSource {
    pub fn from_library(library: &CueLibrary) -> Self {
        AudioSource::Uploaded(library.cues().to_vec())
    }

    /// The active cue list.
    pub fn cues(&self) -> Vec<String> {
        match self {
            AudioSource::Default => DEFAULT_CUES.iter().map(|c| c.to_string()).collect(),
            AudioSource::Uploaded(cues) => cues.clone(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AudioSource::Default => "Default",
            AudioSource::Uploaded(_) => "Custom",
        }
    }
}

/// Settings for one run. Never changes once the run starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// `0` means indefinite.
    pub focus_minutes: u32,
    pub cue_interval_minutes: u32,
    pub total_focus_periods: u32,
    pub break_minutes: u32,
    pub audio_source: AudioSource,
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.cue_interval_minutes < 1 {
            return Err(ValidationError::CueIntervalTooShort(self.cue_interval_minutes));
        }
        if self.focus_minutes > 0 && self.focus_minutes < MIN_TIMED_FOCUS_MINUTES {
            return Err(ValidationError::FocusTooShort(self.focus_minutes));
        }
        if let AudioSource::Uploaded(cues) = &self.audio_source {
            if cues.is_empty() {
                return Err(ValidationError::NoUploadedCues);
            }
            if cues.len() > MAX_UPLOADED_CUES {
                return Err(ValidationError::TooManyCues {
                    count: cues.len(),
                    max: MAX_UPLOADED_CUES,
                });
            }
            let mut names = HashSet::new();
            for cue in cues {
                if !names.insert(cue_file_name(cue)) {
                    return Err(ValidationError::DuplicateCue(cue.clone()));
                }
            }
        }
        if self.total_focus_periods < 1 {
            return Err(ValidationError::NoFocusPeriods);
        }
        if self.break_minutes < 1 {
            return Err(ValidationError::BreakTooShort(self.break_minutes));
        }
        Ok(())
    }

    pub fn is_indefinite(&self) -> bool {
        self.focus_minutes == 0
    }

    pub fn plan(&self) -> CyclePlan {
        CyclePlan {
            focus: PeriodDuration::from_minutes(self.focus_minutes),
            break_secs: u64::from(self.break_minutes).saturating_mul(60),
            cue_interval_secs: u64::from(self.cue_interval_minutes).saturating_mul(60),
            total_focus_periods: self.total_focus_periods,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            focus_minutes: 25,
            cue_interval_minutes: 5,
            total_focus_periods: 4,
            break_minutes: 5,
            audio_source: AudioSource::Default,
        }
    }
}
