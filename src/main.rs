//! Command line tool converting surveyed antenna positions (UTM) to
//! East-North-Up coordinates about the center of array.

mod cli;

use cli::Cli;
use env_logger::{Builder, Target};
use log::{error, LevelFilter};
use std::error::Error as _;
use std::process::ExitCode;

pub fn main() -> ExitCode {
    let cli = Cli::new();

    let mut builder = Builder::from_default_env();
    builder
        .target(Target::Stderr)
        .format_timestamp_secs()
        .format_module_path(false);
    if cli.quiet() {
        builder.filter_level(LevelFilter::Warn);
    } else if std::env::var_os("RUST_LOG").is_none() {
        builder.filter_level(LevelFilter::Info);
    }
    builder.init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            let mut source = e.source();
            while let Some(cause) = source {
                error!("  caused by: {}", cause);
                source = cause.source();
            }
            ExitCode::FAILURE
        },
    }
}

fn run(cli: &Cli) -> antpos::Result<()> {
    let config = cli.config()?;

    if cli.dump_config() {
        println!("{}", config.to_json()?);
        return Ok(());
    }

    antpos::run(&config)?;
    Ok(())
}
