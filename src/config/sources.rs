use super::models::FileConfig;
use crate::probe::FsProbe;
use config::{ConfigError, Environment, File};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Checked in this order inside each directory
pub const CONFIG_FILE_NAMES: [&str; 3] = [
    "atcoder.config.toml",
    "atcoder.config.json",
    "atcoder.config.yaml",
];
const DOTENV_FILE_NAME: &str = ".env";
const ENV_PREFIX: &str = "ATCODER";
const ENV_SEPARATOR: &str = "__";

/// Where the project config lives, if anywhere
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovered {
    /// Directory relative paths are resolved against
    pub root: PathBuf,
    pub file: Option<PathBuf>,
}

/// Walk from `start` towards the filesystem root and stop at the first
/// directory holding a config file. Without one, `start` is the root.
pub fn discover(start: &Path, probe: &impl FsProbe) -> Discovered {
    for dir in start.ancestors() {
        if let Some(file) = CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| probe.is_file(candidate))
        {
            tracing::debug!("Discovered configuration at {}", file.display());
            return Discovered {
                root: dir.to_path_buf(),
                file: Some(file),
            };
        }
    }

    Discovered {
        root: start.to_path_buf(),
        file: None,
    }
}

/// Variables from `<root>/.env`, overlaid with the process environment
pub fn environment(root: &Path) -> HashMap<String, String> {
    let mut vars = HashMap::new();

    let dotenv = root.join(DOTENV_FILE_NAME);
    if dotenv.is_file() {
        match dotenvy::from_path_iter(&dotenv) {
            Ok(iter) => {
                for item in iter {
                    match item {
                        Ok((key, value)) => {
                            vars.insert(key, value);
                        }
                        Err(e) => {
                            tracing::warn!("Skipping line in {}: {}", dotenv.display(), e)
                        }
                    }
                }
            }
            Err(e) => tracing::warn!("Failed to read {}: {}", dotenv.display(), e),
        }
    }

    vars.extend(std::env::vars());
    vars
}

/// Load the project config file (if any) and `ATCODER__*` overrides from `env`
///
/// `ATCODER__SOURCE__EXTENSION=py` -> `source.extension`
pub fn load_file_config(
    file: Option<&Path>,
    env: HashMap<String, String>,
) -> Result<FileConfig, ConfigError> {
    let mut builder = config::Config::builder();

    if let Some(path) = file {
        tracing::info!("Loading configuration from: {}", path.display());
        builder = builder.add_source(File::from(path).required(true));
    }

    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator(ENV_SEPARATOR)
            .separator(ENV_SEPARATOR)
            .source(Some(env)),
    );

    let config = builder.build()?;
    config.try_deserialize()
}
