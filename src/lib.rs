#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod builder;
pub mod cli;
pub mod config;
pub mod external;
pub mod models;
pub mod resource_paths;
pub mod table;

pub use builder::{BundleError, BundleResult, ResourceBundler, generate};
pub use config::{BundlerConfig, WalkOrder};
pub use external::{ExternalCommandError, run_external_command};
pub use models::{BundleArtifacts, CommandOutput, ResourceEntry};
pub use table::restore_delimiters;
