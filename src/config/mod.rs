//! Configuration resolution
//!
//! Three layers are merged, highest priority first:
//! 1. CLI overrides (`--source.extension rs`, ...)
//! 2. The project config: the nearest `atcoder.config.{toml,json,yaml}` found
//!    walking up from the working directory, overlaid with `ATCODER__*`
//!    environment variables (including those in the project's `.env`)
//! 3. Built-in [`Defaults`]
//!
//! Every leaf is either a literal or computed from the problem and contest
//! being generated. Strings containing `{{` are handlebars templates:
//!
//! ```toml
//! contests_dir = "contests"
//!
//! [source]
//! stem = "{{lower problem.id}}"
//! extension = "py"
//! execute_command = "python3 {{source}}"
//!
//! [[templates]]
//! filename = "README.md"
//! content = "# {{problem.title}}"
//! ```
//!
//! After [`resolve`] every leaf is a [`Resolved`] value that is invoked the
//! same way regardless of how it was written.
//!
//! # Environment Variables
//!
//! `ATCODER__<section>__<key>` overrides the file, e.g.
//! `ATCODER__SOURCE__EXTENSION=py` or `ATCODER__CACHE_MAX_AGE=30s`.

mod layer;
mod models;
mod resolver;
mod setting;
mod sources;
mod validation;

pub use layer::{
    ConfigLayer, DEFAULT_CACHE_MAX_AGE, Defaults, SourceDefaults, SourceLayer, TemplateSpec,
};
pub use models::{FileConfig, FileSourceConfig, FileTemplate};
pub use resolver::{ResolvedConfig, ResolvedSource, ResolvedTemplate, resolve};
pub use setting::{Generator, Resolved, Scope, Setting, SettingError};
pub use sources::{CONFIG_FILE_NAMES, Discovered, discover};
pub use validation::ValidationError;

use crate::probe::{FsProbe, HostFs};
use crate::template::TemplateError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),

    #[error("Invalid template in configuration: {0}")]
    TemplateError(#[from] TemplateError),
}

impl ResolvedConfig {
    /// Discover, load and resolve the configuration for a run started in
    /// `base_dir`
    ///
    /// With `explicit`, that file is used (relative paths are taken from
    /// `base_dir`) and its directory becomes the project root.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - An explicit config file does not exist
    /// - The config file or environment values are malformed
    /// - A template string does not compile
    /// - Validation fails (empty or path-like stem/extension, ...)
    pub fn load(
        base_dir: &Path,
        explicit: Option<&Path>,
        overrides: ConfigLayer,
    ) -> Result<Self, ConfigError> {
        let discovered = locate(base_dir, explicit, &HostFs)?;
        let env = sources::environment(&discovered.root);
        Self::load_with(discovered, env, overrides)
    }

    /// Resolve against an already located project and an explicit environment
    pub fn load_with(
        discovered: Discovered,
        env: HashMap<String, String>,
        overrides: ConfigLayer,
    ) -> Result<Self, ConfigError> {
        let file_config = sources::load_file_config(discovered.file.as_deref(), env)?;
        let project = file_config.into_layer()?;

        validation::validate(&overrides)?;
        validation::validate(&project)?;

        let mut config = resolve(overrides, project, Defaults::default(), &discovered.root);
        config.config_file = discovered.file;
        Ok(config)
    }
}

/// Find the project config: the explicit file, or the nearest one above
/// `base_dir`
pub fn locate(
    base_dir: &Path,
    explicit: Option<&Path>,
    probe: &impl FsProbe,
) -> Result<Discovered, ConfigError> {
    let Some(path) = explicit else {
        return Ok(discover(base_dir, probe));
    };

    let path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    };

    if !probe.is_file(&path) {
        return Err(ConfigError::NotFound(path));
    }

    let root = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| base_dir.to_path_buf());

    Ok(Discovered {
        root,
        file: Some(path),
    })
}
