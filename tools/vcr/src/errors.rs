use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VcrError {
    #[error("encoding error: {0}")]
    Encoding(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("persistence error: {}: {message}", path.display())]
    Persistence { path: PathBuf, message: String },
    #[error("fixture not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("invalid mode: {0}")]
    InvalidMode(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("config parse error: {0}")]
    ConfigParse(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl VcrError {
    pub(crate) fn persistence(path: impl Into<PathBuf>, error: impl ToString) -> Self {
        Self::Persistence {
            path: path.into(),
            message: error.to_string(),
        }
    }
}
