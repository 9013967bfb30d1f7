//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use dictionaria_cli::CliError;

fn main() -> eyre::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    match dictionaria_cli::run() {
        // Help and version requests are not failures.
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        result => result.map_err(eyre::Report::from),
    }
}
