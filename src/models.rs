//! Data structures produced while bundling web resources.

use std::path::PathBuf;

/// One embeddable resource discovered during the directory walk.
///
/// Entries are created, written and dropped one at a time; the content is never kept around once
/// its assignment line is on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceEntry {
  /// Map key: relative path with `/` separators and lower-cased directory segments.
  pub key: String,
  /// File contents exactly as read from disk.
  pub content: String,
}

/// Summary of a finished generation run returned by [`crate::ResourceBundler::generate`].
#[derive(Debug, Clone, Default)]
pub struct BundleArtifacts {
  /// Generated source file that was written.
  pub output_path: PathBuf,
  /// Keys of the embedded resources, in emission order.
  pub resources: Vec<String>,
}

impl BundleArtifacts {
  /// Number of resources written to the generated file.
  pub fn resource_count(&self) -> usize {
    self.resources.len()
  }
}

/// Outcome of an external command that exited successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
  /// Command line handed to the shell.
  pub command: String,
  /// Exit status code, absent when the process was terminated by a signal.
  pub exit_code: Option<i32>,
  /// Captured stdout followed by captured stderr.
  pub output: String,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn counts_emitted_resources() {
    let artifacts = BundleArtifacts {
      output_path: PathBuf::from("webresources.go"),
      resources: vec!["css/site.css".into(), "index.html".into()],
    };

    assert_eq!(artifacts.resource_count(), 2);
    assert!(BundleArtifacts::default().resources.is_empty());
  }
}
