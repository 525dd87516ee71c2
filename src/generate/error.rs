use std::path::PathBuf;
use thiserror::Error;

use crate::config::SettingError;
use crate::remote::FetchError;
use crate::template::TemplateError;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Contest directory already exists: {} (use --force to replace it)", .0.display())]
    DirectoryExists(PathBuf),

    #[error("Contest not found: {0}")]
    ContestNotFound(String),

    #[error("Invalid contest id '{0}': expected letters, digits, '_' or '-'")]
    InvalidContestId(String),

    #[error("Failed to fetch {what}: {source}")]
    Fetch {
        what: String,
        #[source]
        source: FetchError,
    },

    #[error("Failed to evaluate setting: {0}")]
    Setting(#[from] SettingError),

    #[error("Failed to render test runner: {0}")]
    Template(#[from] TemplateError),

    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode manifest: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GenerateError>;

impl GenerateError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| GenerateError::Io { path, source }
    }
}
