//! Dynamic shell completion
//!
//! Shells register with `atcoder completions <shell>` (or `COMPLETE=<shell>
//! atcoder`). On every tab press the shell calls back into the binary, which
//! answers contest ids from the cached contest list and only goes to the
//! network when nothing is cached yet.

use atcoder_cli::Result;
use atcoder_cli::cache::CacheStore;
use atcoder_cli::config::DEFAULT_CACHE_MAX_AGE;
use atcoder_cli::remote::{AtCoderClient, Contest};
use clap::CommandFactory;
use clap_complete::env::{Bash, Elvish, EnvCompleter, Fish, Powershell, Zsh};
use clap_complete::{CompleteEnv, CompletionCandidate, Shell};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::debug;

use crate::cli::{CACHE_DIR_ENV, Cli};
use crate::commands::open_cache;

pub const COMPLETE_ENV: &str = "COMPLETE";

/// Answer a pending completion request and exit, if there is one
pub fn handle_request() {
    CompleteEnv::with_factory(Cli::command)
        .var(COMPLETE_ENV)
        .complete();
}

/// Candidates for the `gen` contest id
pub fn contest_candidates() -> Vec<CompletionCandidate> {
    let cache_dir = std::env::var_os(CACHE_DIR_ENV).map(PathBuf::from);
    match open_cache(cache_dir).and_then(contest_list) {
        Ok(contests) => candidates(contests),
        Err(e) => {
            debug!("Contest completion unavailable: {e}");
            Vec::new()
        }
    }
}

fn contest_list(cache: CacheStore) -> Result<Vec<Contest>> {
    let client = AtCoderClient::with_http(cache)?;
    if let Some(contests) = client.cached_contests()? {
        return Ok(contests);
    }

    // Completion runs before the command's runtime does any work, so the
    // fetch gets a runtime of its own on a separate thread.
    let fetch = std::thread::spawn(move || -> Result<Vec<Contest>> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(runtime.block_on(client.contests(DEFAULT_CACHE_MAX_AGE))?)
    });
    fetch.join().unwrap_or_else(|_| Ok(Vec::new()))
}

fn candidates(contests: Vec<Contest>) -> Vec<CompletionCandidate> {
    contests
        .into_iter()
        .map(|contest| CompletionCandidate::new(contest.id).help(Some(contest.title.into())))
        .collect()
}

/// Print the script that registers dynamic completion with `shell`
pub fn write_registration(shell: Shell, out: &mut dyn Write) -> io::Result<()> {
    let completer: &dyn EnvCompleter = match shell {
        Shell::Bash => &Bash,
        Shell::Elvish => &Elvish,
        Shell::Fish => &Fish,
        Shell::PowerShell => &Powershell,
        Shell::Zsh => &Zsh,
        _ => &Bash,
    };
    let command = Cli::command();
    let name = command.get_name();
    completer.write_registration(COMPLETE_ENV, name, name, name, out)
}
