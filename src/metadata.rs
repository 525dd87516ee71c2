//! Per-problem manifest (`metadata.json`)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::probe::{FsProbe, HostFs};

pub const METADATA_FILE_NAME: &str = "metadata.json";

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed manifest {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMetadata {
    /// Relative to the problem directory
    pub path: String,
    pub compile_command: String,
    pub execute_command: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestMetadata {
    pub input: String,
    pub output: String,
}

impl TestMetadata {
    /// Paths of the 1-indexed sample pair `index`
    pub fn numbered(index: usize) -> Self {
        Self {
            input: format!("tests/in_{index}.txt"),
            output: format!("tests/out_{index}.txt"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub contest: String,
    pub problem: String,
    pub source: SourceMetadata,
    pub tests: Vec<TestMetadata>,
}

impl Metadata {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(path: &Path, raw: &str) -> Result<Self, MetadataError> {
        serde_json::from_str(raw).map_err(|source| MetadataError::Malformed {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// A manifest and the problem directory holding it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    pub dir: PathBuf,
    pub metadata: Metadata,
}

/// Nearest manifest at or above `start` on the real filesystem. A relative
/// `start` is taken from `base_dir`.
pub fn find(base_dir: &Path, start: &Path) -> Result<Option<Located>, MetadataError> {
    find_with(base_dir, start, &HostFs)
}

/// Nearest manifest at or above `start`. A file path starts the search in its
/// directory.
pub fn find_with(
    base_dir: &Path,
    start: &Path,
    probe: &impl FsProbe,
) -> Result<Option<Located>, MetadataError> {
    let start = base_dir.join(start);
    let start = if probe.is_file(&start) {
        start.parent().map_or_else(|| start.clone(), Path::to_path_buf)
    } else {
        start
    };

    for dir in start.ancestors() {
        let candidate = dir.join(METADATA_FILE_NAME);
        if !probe.is_file(&candidate) {
            continue;
        }

        debug!("Found manifest at {}", candidate.display());
        let raw = probe
            .read_to_string(&candidate)
            .map_err(|source| MetadataError::Io {
                path: candidate.clone(),
                source,
            })?;
        let metadata = Metadata::from_json(&candidate, &raw)?;
        return Ok(Some(Located {
            dir: dir.to_path_buf(),
            metadata,
        }));
    }

    Ok(None)
}
