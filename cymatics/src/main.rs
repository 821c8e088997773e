mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Args, Command};
use cymatics::config::Config;
use cymatics::figures::{render_anode, render_chladni};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::parse_file(path)?,
        None => Config::default(),
    };
    cli::apply_args(&mut config, &args);
    config.validate()?;
    config.log_summary();

    match args.command {
        Command::Chladni { .. } => {
            render_chladni(&config.chladni, &config.output)?;
        }
        Command::Anode { .. } => {
            render_anode(&config.anode, &config.output)?;
        }
        Command::All => {
            render_chladni(&config.chladni, &config.output)?;
            render_anode(&config.anode, &config.output)?;
        }
    }

    info!(dir = %config.output.dir.display(), "done");
    Ok(())
}
