//! User-uploaded cue files.
//!
//! A batch is first cut down to the space left under [`MAX_UPLOADED_CUES`];
//! what survives is then checked against the names already in the library.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::MAX_UPLOADED_CUES;

/// What happened to each file of an uploaded batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReport {
    pub added: Vec<String>,
    /// Dropped because the library was full.
    pub overflow: Vec<String>,
    /// Dropped because a file with the same name is already present.
    pub duplicates: Vec<String>,
}

impl UploadReport {
    pub fn has_overflow(&self) -> bool {
        !self.overflow.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CueLibrary {
    cues: Vec<String>,
}

/// Name a cue is compared by: the last path component, or the whole string.
pub fn cue_file_name(cue: &str) -> &str {
    Path::new(cue)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(cue)
}

impl CueLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cues(&self) -> &[String] {
        &self.cues
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    pub fn space_remaining(&self) -> usize {
        MAX_UPLOADED_CUES.saturating_sub(self.cues.len())
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.cues.iter().any(|c| cue_file_name(c) == name)
    }

    pub fn add_batch<I, S>(&mut self, batch: I) -> UploadReport
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut report = UploadReport::default();
        let space = self.space_remaining();

        for (i, cue) in batch.into_iter().map(Into::into).enumerate() {
            if i >= space {
                report.overflow.push(cue);
            } else if self.contains_name(cue_file_name(&cue)) {
                report.duplicates.push(cue);
            } else {
                report.added.push(cue.clone());
                self.cues.push(cue);
            }
        }
        report
    }

    /// Remove the cue with the given file name. Returns whether one was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        match self.cues.iter().position(|c| cue_file_name(c) == name) {
            Some(index) => {
                self.cues.remove(index);
                true
            }
            None => false,
        }
    }
}
