// Entrypoint for the CLI application.
// - Parses arguments, sets up logging and resolves the configuration.
// - Every exit code is decided here; the library never terminates the process.

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use env_logger::Env;
use gitea_release_attach::config::{Args, Config};
use gitea_release_attach::{ui, AttachError};
use log::error;
use std::process;

fn main() {
    let args = Args::parse();

    let level = match args.log_level() {
        Ok(level) => level,
        Err(e) => Args::command().error(ErrorKind::ValueValidation, e).exit(),
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(level.to_string())).init();

    let result = Config::from_env(args)
        .map_err(anyhow::Error::from)
        .and_then(|config| ui::run(&config));

    if let Err(e) = result {
        error!("{:#}", e);
        // Logging may be filtered by RUST_LOG, the reason must still reach the user.
        if !log::log_enabled!(log::Level::Error) {
            eprintln!("Error: {:#}", e);
        }
        let code = e
            .downcast_ref::<AttachError>()
            .map(AttachError::exit_code)
            .unwrap_or(3);
        process::exit(code);
    }
}
