//! Bundler configuration and discovery of the optional JSON config file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// File name searched for by [`BundlerConfig::discover`].
pub const DEFAULT_CONFIG_FILE: &str = "resource_bundler.json";

/// Order in which the resource directory is walked and entries are emitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WalkOrder {
    /// Entries of every directory sorted by file name, identical on every platform.
    #[default]
    Sorted,
    /// Whatever order the operating system reports directory entries in.
    Filesystem,
}

/// Everything the bundler needs for one generation run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BundlerConfig {
    /// Directory holding the web resources.
    pub root_dir: PathBuf,
    /// Generated source file, overwritten on every run.
    pub output_path: PathBuf,
    /// File extensions (without the leading dot) that are embedded.
    pub allowed_extensions: Vec<String>,
    /// Character opening and closing each raw string literal.
    pub delimiter: char,
    /// Name of the map variable filled by the generated code.
    pub map_name: String,
    /// Package declared at the top of the generated file.
    pub package_name: String,
    /// Function wrapping the generated assignments.
    pub function_name: String,
    /// Directory walk order.
    pub walk_order: WalkOrder,
    /// Shell command run after generation when a build is requested.
    pub build_command: String,
    /// Shell command run after a successful build.
    pub install_command: String,
}

impl Default for BundlerConfig {
    fn default() -> Self {
        Self {
            root_dir: "web".into(),
            output_path: "webresources.go".into(),
            allowed_extensions: vec!["html".into(), "css".into(), "js".into()],
            delimiter: '`',
            map_name: "webresources".into(),
            package_name: "main".into(),
            function_name: "setVariables".into(),
            walk_order: WalkOrder::Sorted,
            build_command: "go build".into(),
            install_command: "go install".into(),
        }
    }
}

/// Failure to load an explicitly requested configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// Path that caused the error.
        path: PathBuf,
        /// Source I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid configuration JSON.
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        /// Path that caused the error.
        path: PathBuf,
        /// Source parse error.
        #[source]
        source: serde_json::Error,
    },
}

impl BundlerConfig {
    /// Look for [`DEFAULT_CONFIG_FILE`] in `dir`.
    ///
    /// A missing or unparsable file yields the defaults so a bare checkout keeps working.
    pub fn discover(dir: &Path) -> Self {
        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        match Self::from_path(&candidate) {
            Ok(config) => config,
            Err(ConfigError::Io { .. }) => Self::default(),
            Err(err) => {
                tracing::warn!(error = %err, "ignoring invalid bundler config");
                Self::default()
            }
        }
    }

    /// Read configuration from a specific JSON file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let parse_error = |source: serde_json::Error| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        };

        // The derived impl would also accept a positional array, so only objects get through.
        let value: serde_json::Value = serde_json::from_str(&content).map_err(parse_error)?;
        if !value.is_object() {
            return Err(parse_error(<serde_json::Error as serde::de::Error>::custom(
                "expected a JSON object",
            )));
        }
        let config: Self = serde_json::from_value(value).map_err(parse_error)?;
        Ok(config.normalised())
    }

    /// Strip leading dots and surrounding whitespace from the extension list.
    pub fn normalised(mut self) -> Self {
        self.allowed_extensions = self
            .allowed_extensions
            .iter()
            .map(|ext| ext.trim().trim_start_matches('.').to_string())
            .filter(|ext| !ext.is_empty())
            .collect();
        self
    }
}
