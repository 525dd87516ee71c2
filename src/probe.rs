//! Filesystem queries used by the upward directory searches.
//!
//! Config discovery and manifest lookup only ever ask "is there a file here"
//! and "what does it contain", so both take a [`FsProbe`] instead of touching
//! the disk directly. Tests hand in a [`MemoryProbe`].

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

pub trait FsProbe {
    fn is_file(&self, path: &Path) -> bool;

    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

/// Probe backed by the real filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct HostFs;

impl FsProbe for HostFs {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// In-memory probe: a set of files with contents
#[derive(Debug, Clone, Default)]
pub struct MemoryProbe {
    files: BTreeMap<PathBuf, String>,
}

impl MemoryProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        self.files.insert(path.into(), contents.into());
        self
    }
}

impl FsProbe for MemoryProbe {
    fn is_file(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.display().to_string()))
    }
}
