use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IgtagError {
    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Filesystem errors
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    // Archive errors
    #[error("Failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    // Date errors
    #[error("Invalid creation timestamp {value}: {source}")]
    InvalidTimestamp {
        value: i64,
        source: time::error::ComponentRange,
    },

    #[error("Date formatting error: {0}")]
    DateFormat(#[from] time::error::Format),

    // External tool errors
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("{program} exited with status {}: {stderr}", .code.map_or_else(|| "unknown".to_string(), |c| c.to_string()))]
    CommandFailed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },
}

impl IgtagError {
    /// Exit code to hand back to the shell for this error.
    ///
    /// A failed external command propagates its own exit code; everything else
    /// (including a tool killed by a signal) maps to 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            IgtagError::CommandFailed {
                code: Some(code), ..
            } if *code != 0 => *code,
            _ => 1,
        }
    }
}

/// Result type for igtag operations.
pub type Result<T> = std::result::Result<T, IgtagError>;
