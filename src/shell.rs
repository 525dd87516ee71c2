//! Runs manifest commands inside a problem directory

use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use thiserror::Error;
use tokio::process::Command;
use tracing::info;

use crate::generate::RUNNER_SCRIPT;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("Failed to start '{command}' in {}: {source}", dir.display())]
    Spawn {
        command: String,
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{command}' exited with {status}")]
    Failed { command: String, status: ExitStatus },
}

fn platform_shell(command: &str) -> Command {
    if cfg!(windows) {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(command);
        cmd
    } else {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command);
        cmd
    }
}

/// Run `command` through the platform shell with `dir` as working directory.
/// Standard streams are inherited.
pub async fn run(command: &str, dir: &Path) -> Result<(), ShellError> {
    info!(command, dir = %dir.display(), "Running command");

    let status = platform_shell(command)
        .current_dir(dir)
        .status()
        .await
        .map_err(|source| ShellError::Spawn {
            command: command.to_string(),
            dir: dir.to_path_buf(),
            source,
        })?;

    if !status.success() {
        return Err(ShellError::Failed {
            command: command.to_string(),
            status,
        });
    }

    Ok(())
}

/// Run the generated sample-test script of a problem directory
pub async fn run_tests(dir: &Path) -> Result<(), ShellError> {
    run(&format!("sh {RUNNER_SCRIPT}"), dir).await
}
