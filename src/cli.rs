use atcoder_cli::config::{FileConfig, FileSourceConfig, FileTemplate};
use atcoder_cli::humanize::HumanDuration;
use clap::{ArgAction, Parser, Subcommand};
use clap_complete::{ArgValueCandidates, Shell};
use std::path::PathBuf;

use crate::complete;

pub const CACHE_DIR_ENV: &str = "ATCODER_CACHE_DIR";

#[derive(Parser, Debug)]
#[command(name = "atcoder", version)]
#[command(about = "Scaffold local directories for AtCoder contests", long_about = None)]
pub struct Cli {
    /// Raise log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Directory of the response cache
    #[arg(long, env = CACHE_DIR_ENV, global = true, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a directory for every problem of a contest
    Gen(GenArgs),
    /// Run the compile command of the nearest problem
    Compile(ManifestArgs),
    /// Run the execute command of the nearest problem
    Execute(ManifestArgs),
    /// Compile, then execute
    Run(ManifestArgs),
    /// Check the nearest problem against its samples
    Test(ManifestArgs),
    /// Print contest ids, one per line
    Contests(ContestsArgs),
    /// Print the script that enables tab completion (contest ids included)
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(clap::Args, Debug)]
pub struct GenArgs {
    /// Contest id, e.g. abc100
    #[arg(add = ArgValueCandidates::new(complete::contest_candidates))]
    pub contest_id: String,

    /// Replace the contest directory if it exists
    #[arg(short, long)]
    pub force: bool,

    /// Config file to use instead of searching parent directories
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// How long cached responses stay valid (milliseconds, or e.g. 30s, 1h)
    #[arg(long, value_name = "DURATION")]
    pub cache_max_age: Option<HumanDuration>,

    #[command(flatten)]
    pub overrides: OverrideArgs,
}

/// Per-run config overrides. Values may be handlebars templates.
#[derive(clap::Args, Debug, Default)]
pub struct OverrideArgs {
    #[arg(long, value_name = "DIR")]
    pub contests_dir: Option<String>,

    #[arg(long, value_name = "TEMPLATE")]
    pub problem_dir: Option<String>,

    #[arg(long = "source.stem", value_name = "TEMPLATE")]
    pub source_stem: Option<String>,

    #[arg(long = "source.extension", value_name = "TEMPLATE")]
    pub source_extension: Option<String>,

    #[arg(long = "source.compile-command", value_name = "TEMPLATE")]
    pub source_compile_command: Option<String>,

    #[arg(long = "source.execute-command", value_name = "TEMPLATE")]
    pub source_execute_command: Option<String>,

    #[arg(long = "source.template", value_name = "TEMPLATE")]
    pub source_template: Option<String>,

    /// Extra files as JSON, e.g. '{"filename":"Makefile","content":"..."}'
    #[arg(long, value_name = "JSON", num_args = 1.., value_parser = parse_template)]
    pub templates: Option<Vec<FileTemplate>>,
}

#[derive(clap::Args, Debug)]
pub struct ManifestArgs {
    /// Start the metadata.json search here instead of the current directory
    #[arg(short, long, value_name = "PATH")]
    pub metadata: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct ContestsArgs {
    #[arg(long, value_name = "DURATION")]
    pub cache_max_age: Option<HumanDuration>,
}

fn parse_template(raw: &str) -> Result<FileTemplate, String> {
    serde_json::from_str(raw).map_err(|e| format!("invalid template JSON: {e}"))
}

impl GenArgs {
    /// CLI overrides in the shape of a config file
    pub fn file_config(&self) -> FileConfig {
        let overrides = &self.overrides;
        FileConfig {
            contests_dir: overrides.contests_dir.clone(),
            problem_dir: overrides.problem_dir.clone(),
            cache_max_age: self.cache_max_age,
            source: FileSourceConfig {
                stem: overrides.source_stem.clone(),
                extension: overrides.source_extension.clone(),
                compile_command: overrides.source_compile_command.clone(),
                execute_command: overrides.source_execute_command.clone(),
                template: overrides.source_template.clone(),
            },
            templates: overrides.templates.clone(),
        }
    }
}
