mod cli;
mod commands;
mod complete;

use atcoder_cli::observability;
use clap::Parser;
use cli::Cli;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    complete::handle_request();
    let cli = Cli::parse();
    observability::init_tracing(cli.verbose);

    match commands::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
