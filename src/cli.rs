//! Command-line surface of the `resource-bundler` binary.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use crate::config::{BundlerConfig, WalkOrder};
use crate::external::{ExternalCommandError, run_external_command};
use crate::models::CommandOutput;

/// Embed static web resources (HTML, CSS, JS) into a generated source file.
///
/// Options not given here are read from `resource_bundler.json` in the working directory, or
/// from the file passed to `--config`.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
  /// JSON configuration file; an unreadable or invalid file is an error.
  #[arg(long, value_name = "FILE")]
  pub config: Option<PathBuf>,
  /// Directory holding the web resources.
  #[arg(long, value_name = "DIR")]
  pub root: Option<PathBuf>,
  /// Generated source file, overwritten on every run.
  #[arg(short, long, value_name = "FILE")]
  pub output: Option<PathBuf>,
  /// Comma separated list of extensions to embed.
  #[arg(long = "ext", value_name = "EXT", value_delimiter = ',')]
  pub extensions: Vec<String>,
  /// Character delimiting the raw string literals.
  #[arg(long, value_name = "CHAR")]
  pub delimiter: Option<char>,
  /// Name of the map variable filled by the generated code.
  #[arg(long, value_name = "NAME")]
  pub map_name: Option<String>,
  /// Package declared by the generated file.
  #[arg(long = "package", value_name = "NAME")]
  pub package_name: Option<String>,
  /// Function wrapping the generated assignments.
  #[arg(long = "function", value_name = "NAME")]
  pub function_name: Option<String>,
  /// Order in which directories are walked and entries emitted.
  #[arg(long, value_enum)]
  pub walk_order: Option<WalkOrder>,
  /// Run the build command and then the install command after generating.
  #[arg(short, long)]
  pub build: bool,
  /// Build command handed to the shell.
  #[arg(long, value_name = "CMD")]
  pub build_command: Option<String>,
  /// Install command handed to the shell.
  #[arg(long, value_name = "CMD")]
  pub install_command: Option<String>,
}

impl Cli {
  /// Load the base configuration relative to `working_dir` and apply the command-line overrides.
  pub fn resolve_config(&self, working_dir: &Path) -> Result<BundlerConfig> {
    let base = match &self.config {
      Some(path) => BundlerConfig::from_path(path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))?,
      None => BundlerConfig::discover(working_dir),
    };
    Ok(self.apply_overrides(base))
  }

  fn apply_overrides(&self, mut config: BundlerConfig) -> BundlerConfig {
    if let Some(root) = &self.root {
      config.root_dir = root.clone();
    }
    if let Some(output) = &self.output {
      config.output_path = output.clone();
    }
    if !self.extensions.is_empty() {
      config.allowed_extensions = self.extensions.clone();
    }
    if let Some(delimiter) = self.delimiter {
      config.delimiter = delimiter;
    }
    if let Some(map_name) = &self.map_name {
      config.map_name = map_name.clone();
    }
    if let Some(package_name) = &self.package_name {
      config.package_name = package_name.clone();
    }
    if let Some(function_name) = &self.function_name {
      config.function_name = function_name.clone();
    }
    if let Some(walk_order) = self.walk_order {
      config.walk_order = walk_order;
    }
    if let Some(build_command) = &self.build_command {
      config.build_command = build_command.clone();
    }
    if let Some(install_command) = &self.install_command {
      config.install_command = install_command.clone();
    }
    config.normalised()
  }
}

/// Run the configured build command and then the install command, printing each one's output.
///
/// Stops at the first command exiting with a non-zero status; later commands are not started.
pub fn run_build_steps(config: &BundlerConfig) -> Result<Vec<CommandOutput>, ExternalCommandError> {
  let steps = [
    ("build", config.build_command.as_str()),
    ("install", config.install_command.as_str()),
  ];

  let mut outputs = Vec::with_capacity(steps.len());
  for (title, command) in steps {
    println!("{title}: {command}");
    let result = run_external_command(command, title)?;
    print!("{}", result.output);
    outputs.push(result);
  }
  Ok(outputs)
}
