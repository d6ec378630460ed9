use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("source not found: {}", path.display())]
    SourceNotFound { path: PathBuf },
    #[error("failed to parse {}: {message}", path.display())]
    ParseError { path: PathBuf, message: String },
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unknown view: {0}")]
    UnknownView(String),
    #[error("invalid progress target: {0} (must be greater than zero)")]
    InvalidTarget(u64),
}

impl DashboardError {
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ParseError {
            path: path.into(),
            message: message.into(),
        }
    }
}
