use std::path::PathBuf;
use thiserror::Error;

use crate::cache::CacheError;
use crate::config::{ConfigError, SettingError};
use crate::generate::GenerateError;
use crate::metadata::MetadataError;
use crate::remote::FetchError;
use crate::shell::ShellError;

/// Everything a command can fail with
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Setting(#[from] SettingError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error(transparent)]
    Shell(#[from] ShellError),

    #[error("No {} found in {} or any parent directory", crate::metadata::METADATA_FILE_NAME, .0.display())]
    ManifestNotFound(PathBuf),

    #[error("Cache directory could not be determined; pass --cache-dir")]
    NoCacheDir,

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
