use std::path::PathBuf;

use thiserror::Error;

/// Application-level error type for the pipeline and the results log.
/// Model failures never surface here: agents degrade to fallback text instead.
/// The heuristic core (`content`) never returns errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed results file {}: {message}", path.display())]
    Results { path: PathBuf, message: String },
}

impl AppError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.into(),
            source,
        }
    }
}
