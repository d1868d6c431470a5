mod cli;

use anyhow::Context;
use sched_model::{SimConfig, config::ENV_CONFIG};
use std::{env, io, path::PathBuf};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let config_path = env::var_os(ENV_CONFIG).map(PathBuf::from);
    let config = SimConfig::load(config_path.as_deref()).context("failed to load configuration")?;

    let mut menu = cli::Menu::new(io::stdin().lock(), io::stdout(), config);
    menu.run().context("terminal I/O failed")?;
    Ok(())
}
