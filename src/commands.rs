use atcoder_cli::cache::CacheStore;
use atcoder_cli::config::{ConfigError, ConfigLayer, ResolvedConfig};
use atcoder_cli::generate::{self, GenerateRequest};
use atcoder_cli::metadata::{self, Located};
use atcoder_cli::remote::AtCoderClient;
use atcoder_cli::{Error, Result, shell};
use clap_complete::Shell;
use directories::ProjectDirs;
use std::io;
use std::path::PathBuf;
use tracing::info;

use crate::cli::{Cli, Commands, ContestsArgs, GenArgs, ManifestArgs};
use crate::complete;

pub async fn run(cli: Cli) -> Result<()> {
    let cache_dir = cli.cache_dir;

    match cli.command {
        Commands::Gen(args) => generate_contest(args, cache_dir).await,
        Commands::Compile(args) => {
            let located = locate_manifest(&args)?;
            shell::run(&located.metadata.source.compile_command, &located.dir).await?;
            Ok(())
        }
        Commands::Execute(args) => {
            let located = locate_manifest(&args)?;
            shell::run(&located.metadata.source.execute_command, &located.dir).await?;
            Ok(())
        }
        Commands::Run(args) => {
            let located = locate_manifest(&args)?;
            shell::run(&located.metadata.source.compile_command, &located.dir).await?;
            shell::run(&located.metadata.source.execute_command, &located.dir).await?;
            Ok(())
        }
        Commands::Test(args) => {
            let located = locate_manifest(&args)?;
            shell::run_tests(&located.dir).await?;
            Ok(())
        }
        Commands::Contests(args) => list_contests(args, cache_dir).await,
        Commands::Completions { shell } => print_completions(shell),
    }
}

async fn generate_contest(args: GenArgs, cache_dir: Option<PathBuf>) -> Result<()> {
    let base_dir = std::env::current_dir()?;
    let overrides = args
        .file_config()
        .into_layer()
        .map_err(ConfigError::from)?;
    let config = ResolvedConfig::load(&base_dir, args.config.as_deref(), overrides)?;

    let client = AtCoderClient::with_http(open_cache(cache_dir)?)?;
    let request = GenerateRequest::new(args.contest_id).force(args.force);
    let report = generate::generate(&request, &config, &client).await?;

    println!(
        "Generated {} ({} problems) in {}",
        request.contest_id,
        report.problems.len(),
        report.contest_dir.display()
    );
    Ok(())
}

async fn list_contests(args: ContestsArgs, cache_dir: Option<PathBuf>) -> Result<()> {
    let base_dir = std::env::current_dir()?;
    let overrides = ConfigLayer {
        cache_max_age: args.cache_max_age.map(|age| age.as_duration()),
        ..Default::default()
    };
    let config = ResolvedConfig::load(&base_dir, None, overrides)?;
    let max_age = config.cache_max_age.get()?;

    let client = AtCoderClient::with_http(open_cache(cache_dir)?)?;
    for contest in client.contests(max_age).await? {
        println!("{}", contest.id);
    }
    Ok(())
}

fn locate_manifest(args: &ManifestArgs) -> Result<Located> {
    let base_dir = std::env::current_dir()?;
    let start = args.metadata.clone().unwrap_or_else(|| base_dir.clone());
    metadata::find(&base_dir, &start)?.ok_or(Error::ManifestNotFound(start))
}

pub(crate) fn open_cache(cache_dir: Option<PathBuf>) -> Result<CacheStore> {
    let dir = match cache_dir {
        Some(dir) => dir,
        None => default_cache_dir().ok_or(Error::NoCacheDir)?,
    };
    info!("Using cache at {}", dir.display());
    Ok(CacheStore::open(&dir)?)
}

fn default_cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "atcoder-cli").map(|dirs| dirs.cache_dir().to_path_buf())
}

fn print_completions(shell: Shell) -> Result<()> {
    complete::write_registration(shell, &mut io::stdout())?;
    Ok(())
}
