use thiserror::Error;

/// Failures that abort linting a single file.
///
/// Heuristic misses inside the detector are never errors; they degrade to
/// lower confidence instead.
#[derive(Debug, Error)]
pub enum LintError {
    #[error("failed to parse {file}: {message}")]
    Parse { file: String, message: String },

    #[error("invalid lint configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid detection pattern: {0}")]
    Pattern(#[from] regex::Error),
}

pub type LintResult<T> = Result<T, LintError>;
