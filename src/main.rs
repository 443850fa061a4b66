use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use resource_bundler::ResourceBundler;
use resource_bundler::cli::{Cli, run_build_steps};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // RESOURCE_BUNDLER_LOG controls verbosity, defaulting to "info"
    let filter = EnvFilter::try_from_env("RESOURCE_BUNDLER_LOG")
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.resolve_config(Path::new("."))?;

    let artifacts = ResourceBundler::new(&config)
        .generate()
        .with_context(|| format!("failed to generate {}", config.output_path.display()))?;
    println!(
        "Embedded {} resources from {} into {}",
        artifacts.resource_count(),
        config.root_dir.display(),
        artifacts.output_path.display()
    );

    if cli.build {
        run_build_steps(&config)?;
    }

    Ok(())
}
