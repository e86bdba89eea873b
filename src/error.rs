use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, NoveltyError>;

#[derive(Error, Debug)]
pub enum NoveltyError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(
        "No terminator transfer types enabled, expected at least one of ret, icall, ijmp"
    )]
    NoTerminators,

    #[error("Sequence length must be >= 1, got {0}")]
    InvalidSequenceLength(usize),

    #[error("Set file {} either does not exist or is not a file", .0.display())]
    SetFileMissing(PathBuf),

    #[error("Could not find trace {}", .path.display())]
    TraceUnavailable { path: PathBuf },

    #[error("Malformed record at {}:{line}: {reason}", .path.display())]
    MalformedRecord {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Novelty ratio undefined: no qualifying sequence in trace")]
    DivisionUndefined,

    #[error("Processing interrupted")]
    Interrupted,

    #[error("Failed to parse environment variable {var_name}: value '{value}' - {error}")]
    EnvParseError {
        var_name: String,
        value: String,
        error: String,
    },
}

impl NoveltyError {
    /// Errors that keep a single trace from being opened. The set loop
    /// writes a skip marker for them and moves on to the next trace.
    pub fn is_trace_local(&self) -> bool {
        matches!(
            self,
            NoveltyError::TraceUnavailable { .. } | NoveltyError::Io(_)
        )
    }
}
