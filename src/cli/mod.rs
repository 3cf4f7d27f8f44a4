mod args;
mod commands;

pub use args::Cli;

use std::process::ExitCode;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use crate::error::ForgeError;

impl Cli {
    pub async fn run(self) -> Result<()> {
        commands::run(self).await
    }
}

/// Log to stderr at info, or debug with `-v`; `RUST_LOG` adds further directives.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(default_level.into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Exit status for a failed run, distinct per error kind.
pub fn exit_code(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<ForgeError>() {
        Some(forge) => {
            tracing::debug!(kind = %forge.kind(), "run failed");
            forge.kind().exit_code()
        }
        None => ExitCode::FAILURE,
    }
}
