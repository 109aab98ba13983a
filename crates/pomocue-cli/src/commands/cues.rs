use clap::Subcommand;
use pomocue_core::audio::{CueLibrary, DEFAULT_CUES, MAX_UPLOADED_CUES};
use pomocue_core::error::Result;

#[derive(Subcommand)]
pub enum CuesAction {
    /// List the built-in cues
    Default,
    /// Apply the upload rules to a list of files and report the result
    Check {
        /// Cue files, in upload order
        #[arg(required = true)]
        files: Vec<String>,
    },
}

pub fn run(action: CuesAction) -> Result<()> {
    match action {
        CuesAction::Default => {
            for cue in DEFAULT_CUES {
                println!("{cue}");
            }
        }
        CuesAction::Check { files } => {
            let mut library = CueLibrary::new();
            let report = library.add_batch(files);
            super::warn_upload(&report);
            println!("{}", serde_json::to_string_pretty(&report)?);
            println!("{} / {MAX_UPLOADED_CUES} files selected", library.len());
        }
    }
    Ok(())
}
