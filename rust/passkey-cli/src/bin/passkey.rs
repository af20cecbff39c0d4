use anyhow::Result;
use clap::Parser;
use passkey_cli::{cli::PasskeyCli, commands};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = PasskeyCli::parse();

    let filter = match cli.options.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    commands::run(cli, &mut std::io::stdout().lock())
}
