use anyhow::Result;
use api_snapshot::cli::Cli;
use api_snapshot::config::{RunConfig, resolve_javap_path};
use api_snapshot::extract::run;
use api_snapshot::javap::Javap;
use clap::Parser;
use std::io::Write;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = RunConfig::from_cli(&cli)?;
    let javap = Javap::new(resolve_javap_path());
    tracing::debug!(javap = %javap.bin().display(), ?config, "starting run");

    let start = Instant::now();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let result = run(&config, &javap, &mut out)?;
    out.flush()?;
    result.into_outcome()?;

    writeln!(out, "time taken: {} ms", start.elapsed().as_millis())?;
    Ok(())
}
