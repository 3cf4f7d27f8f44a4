mod cli;
mod client;
mod config;
mod decoder;
mod error;
mod pipeline;
mod prompt;
mod publish;
mod request;
mod schema;
mod trace;
mod writer;

use std::process::ExitCode;

use clap::Parser;
use colored::*;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbose);

    match cli.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".bold().red());
            cli::exit_code(&err)
        }
    }
}
