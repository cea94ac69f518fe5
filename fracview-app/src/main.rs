mod display;
mod error;
mod navigation;
mod preferences;
mod shell;

use std::io;
use std::process::ExitCode;

use tracing::{error, info};

use error::Result;

use preferences::Preferences;
use shell::Shell;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting Fracview");

    let prefs = Preferences::load();
    let mut shell = match Shell::new(prefs) {
        Ok(shell) => shell,
        Err(e) => {
            error!("Failed to start: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = shell.run(io::stdin().lock());
    shell.preferences().save();

    match result {
        Ok(()) => {
            info!("Bye");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
