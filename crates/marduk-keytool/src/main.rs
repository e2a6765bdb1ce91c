use clap::Parser;
use marduk_paintkey::logging::{LoggingConfig, init_logging};

mod cli;
mod commands;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    init_logging(LoggingConfig {
        env_filter: cli.verbose.then(|| "debug".to_owned()),
        ..LoggingConfig::default()
    });

    commands::run(cli)
}
