use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SubburnError {
    #[error("Invalid {kind} path: '{}'", .path.display())]
    InvalidInput { kind: &'static str, path: PathBuf },

    #[error("Video is too short: subtitles need {required} seconds, video has {available}")]
    InsufficientMediaLength { required: u64, available: u64 },

    #[error("Start position has to be shorter: {start} + {duration} seconds does not fit in {available}")]
    StartOutOfRange {
        start: u64,
        duration: u64,
        available: u64,
    },

    #[error("{tool} failed: {message}")]
    ExternalTool { tool: String, message: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{0}")]
    Parse(String),
}
