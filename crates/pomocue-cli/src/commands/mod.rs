pub mod config;
pub mod cues;
pub mod run;

use pomocue_core::audio::MAX_UPLOADED_CUES;
use pomocue_core::UploadReport;

/// Tell the user about files an upload dropped.
pub(crate) fn warn_upload(report: &UploadReport) {
    if report.has_overflow() {
        eprintln!(
            "Maximum upload limit is {MAX_UPLOADED_CUES} files. Only {} files were added this time.",
            report.added.len()
        );
    }
    for cue in &report.duplicates {
        eprintln!("skipped duplicate cue file: {cue}");
    }
}
