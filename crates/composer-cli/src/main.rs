//! Composer command-line tool.

mod commands;

use clap::Parser;
use commands::Command;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "composer", version, about = "Create, inspect and export Composer projects")]
struct Cli {
    /// Editor config file (JSON).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let mut stdout = std::io::stdout().lock();
    match commands::run(cli.command, cli.config.as_deref(), &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{}", err);
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
